//! Remove build output

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Site;

/// Delete the output directory, mirrored assets and the sitemap
pub fn run(site: &Site) -> Result<()> {
    remove(&site.output_dir)?;
    remove(&site.public_dir.join("content"))?;
    remove(&site.public_dir.join("sitemap.xml"))?;
    remove(&site.public_dir.join("robots.txt"))?;
    Ok(())
}

fn remove(path: &Path) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
        tracing::info!("Deleted: {:?}", path);
    } else if path.exists() {
        fs::remove_file(path)?;
        tracing::info!("Deleted: {:?}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, RepoConfig, SiteSettings};
    use tempfile::TempDir;

    #[test]
    fn test_clean_keeps_other_public_files() {
        let temp = TempDir::new().unwrap();
        let site = Site::from_parts(
            temp.path().to_path_buf(),
            Environment::default(),
            SiteSettings::default(),
            RepoConfig::default(),
        );

        fs::create_dir_all(&site.output_dir).unwrap();
        fs::write(site.output_dir.join("posts-manifest.json"), "{}").unwrap();
        fs::create_dir_all(site.public_dir.join("content/images")).unwrap();
        fs::write(site.public_dir.join("sitemap.xml"), "").unwrap();
        fs::write(site.public_dir.join("favicon.ico"), "").unwrap();

        run(&site).unwrap();

        assert!(!site.output_dir.exists());
        assert!(!site.public_dir.join("content").exists());
        assert!(!site.public_dir.join("sitemap.xml").exists());
        assert!(site.public_dir.join("favicon.ico").exists());
    }
}
