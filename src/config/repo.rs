//! Repository descriptor (repo.config.json)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Website and content repository coordinates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub website: RepoRef,
    pub content: ContentRepoRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    pub url: String,
    pub branch: String,
}

impl Default for RepoRef {
    fn default() -> Self {
        Self {
            owner: "yourusername".to_string(),
            name: "your-website".to_string(),
            url: "https://github.com/yourusername/your-website".to_string(),
            branch: "main".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentRepoRef {
    pub owner: String,
    pub name: String,
    pub url: String,
    pub branch: String,
    /// Bundled checkout location, relative to the site root
    pub submodule_path: String,
}

impl Default for ContentRepoRef {
    fn default() -> Self {
        Self {
            owner: "yourusername".to_string(),
            name: "your-content".to_string(),
            url: "https://github.com/yourusername/your-content".to_string(),
            branch: "main".to_string(),
            submodule_path: "content".to_string(),
        }
    }
}

impl RepoConfig {
    /// Load the descriptor from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Raw URL of a file in the content repository
    pub fn content_file_url(&self, file: &str) -> String {
        raw_url(
            &self.content.owner,
            &self.content.name,
            &self.content.branch,
            file,
        )
    }
}

fn raw_url(owner: &str, name: &str, branch: &str, file: &str) -> String {
    format!(
        "https://raw.githubusercontent.com/{}/{}/{}/{}",
        owner,
        name,
        branch,
        file.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_file_url() {
        let json = r#"{
            "content": { "owner": "arvinsingh", "name": "apsbali-content", "branch": "main" }
        }"#;
        let repo: RepoConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            repo.content_file_url("config.json"),
            "https://raw.githubusercontent.com/arvinsingh/apsbali-content/main/config.json"
        );
        assert_eq!(repo.content.submodule_path, "content");
        assert_eq!(repo.website.owner, "yourusername");
    }
}
