//! Create a new post or note

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::Collection;
use crate::Site;

/// Scaffold a content file and return its path
pub fn create(site: &Site, kind: &str, title: &str) -> Result<PathBuf> {
    let Some(collection) = Collection::parse(kind) else {
        anyhow::bail!("Unknown kind: {}. Available: post, note", kind);
    };

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    let target_dir = site.reader().collection_dir(collection);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let date = chrono::Local::now().format("%Y-%m-%d");
    let content = format!(
        "---\ntitle: {}\ndate: {}\ndescription: \"\"\ntags: []\npublished: false\n---\n",
        serde_json::to_string(title)?,
        date
    );

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, RepoConfig, SiteSettings};
    use crate::content::loader::parse_item;
    use tempfile::TempDir;

    fn site(temp: &TempDir) -> Site {
        Site::from_parts(
            temp.path().to_path_buf(),
            Environment::default(),
            SiteSettings::default(),
            RepoConfig::default(),
        )
    }

    #[test]
    fn test_create_note_is_draft() {
        let temp = TempDir::new().unwrap();
        let site = site(&temp);

        let path = create(&site, "note", "Reading: Welsh Phonology").unwrap();
        assert!(path.ends_with("notes/reading-welsh-phonology.md"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("title: \"Reading: Welsh Phonology\""));
        // Drafts stay hidden until published
        assert!(parse_item(&path, &content, Collection::Notes).unwrap().is_none());
    }

    #[test]
    fn test_create_rejects_duplicates_and_unknown_kinds() {
        let temp = TempDir::new().unwrap();
        let site = site(&temp);

        create(&site, "post", "Hello").unwrap();
        assert!(create(&site, "post", "Hello").is_err());
        assert!(create(&site, "page", "Hello").is_err());
    }
}
