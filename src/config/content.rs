//! Content configuration (config.json in the content repository)
//!
//! Personal identity, social links and page copy that change between content
//! repositories. Every required field must be present for a document to
//! deserialize; the built-in default fills all of them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The canonical site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    pub personal: PersonalInfo,
    pub social: IndexMap<String, SocialLink>,
    pub repository: RepositoryInfo,
    pub about: AboutInfo,
    pub resume: ResumeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: NameForms,
    pub title: String,
    pub description: String,
    pub location: String,
    pub bio: Bio,
    pub email: String,
    pub website: Website,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameForms {
    pub full: String,
    pub first: String,
    /// Shorter form for headers
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bio {
    pub short: String,
    pub medium: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Website {
    pub url: String,
    pub domain: String,
}

/// A social profile link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub url: String,
    pub icon: String,
    /// Whether to show in UI
    pub display: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutInfo {
    pub title: String,
    pub description: String,
    pub content: AboutContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    pub introduction: String,
    pub purpose: String,
    pub closing: String,
    pub source_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInfo {
    pub google_drive_id: String,
    pub filename: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        let mut social = IndexMap::new();
        social.insert(
            "github".to_string(),
            SocialLink {
                name: "GitHub".to_string(),
                username: Some("yourusername".to_string()),
                url: "https://github.com/yourusername".to_string(),
                icon: "github".to_string(),
                display: true,
            },
        );

        Self {
            personal: PersonalInfo {
                name: NameForms {
                    full: "Your Name".to_string(),
                    first: "Your".to_string(),
                    display: "Your Name".to_string(),
                },
                title: "Developer".to_string(),
                description: "A developer who builds things.".to_string(),
                location: "Earth".to_string(),
                bio: Bio {
                    short: "A developer who builds things.".to_string(),
                    medium: "Hello! I am a developer who builds things.".to_string(),
                    long: None,
                },
                email: "your.email@example.com".to_string(),
                website: Website {
                    url: "https://your-domain.com".to_string(),
                    domain: "your-domain.com".to_string(),
                },
            },
            social,
            repository: RepositoryInfo {
                url: "https://github.com/yourusername/your-repo".to_string(),
                name: "your-repo".to_string(),
            },
            about: AboutInfo {
                title: "About".to_string(),
                description: "About this website.".to_string(),
                content: AboutContent {
                    introduction: "Welcome to my website.".to_string(),
                    purpose: "This is where I share my thoughts.".to_string(),
                    closing: "Thank you for visiting.".to_string(),
                    source_code: "Website source code: ".to_string(),
                },
            },
            resume: ResumeInfo {
                google_drive_id: String::new(),
                filename: "resume.pdf".to_string(),
            },
        }
    }
}

impl ContentConfig {
    /// Parse and validate a configuration document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// `@handle` for the twitter link, or a placeholder
    pub fn twitter_handle(&self) -> String {
        self.social
            .get("twitter")
            .and_then(|link| link.username.as_deref())
            .map(|username| format!("@{}", username))
            .unwrap_or_else(|| "@yourusername".to_string())
    }

    pub fn website_url(&self) -> &str {
        &self.personal.website.url
    }

    pub fn website_domain(&self) -> &str {
        &self.personal.website.domain
    }

    /// Social links in document order, optionally only those marked for display
    pub fn social_links(&self, display_only: bool) -> IndexMap<&str, &SocialLink> {
        self.social
            .iter()
            .filter(|(_, link)| !display_only || link.display)
            .map(|(key, link)| (key.as_str(), link))
            .collect()
    }

    pub fn personal(&self) -> &PersonalInfo {
        &self.personal
    }

    pub fn repository(&self) -> &RepositoryInfo {
        &self.repository
    }

    pub fn about(&self) -> &AboutInfo {
        &self.about
    }

    pub fn resume(&self) -> &ResumeInfo {
        &self.resume
    }
}
