//! Site settings (site.yml)
//!
//! Static settings that do not depend on the content repository: feature
//! flags, display thresholds and build locations.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::Category;

/// Main site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub features: FeatureFlags,
    pub projects: ProjectSettings,
    pub blog: BlogSettings,
    pub notes: NotesSettings,
    pub build: BuildSettings,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            features: FeatureFlags::default(),
            projects: ProjectSettings::default(),
            blog: BlogSettings::default(),
            notes: NotesSettings::default(),
            build: BuildSettings::default(),
        }
    }
}

impl SiteSettings {
    /// Load settings from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings: SiteSettings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Routes exposed in navigation, filtered by feature flags
    pub fn enabled_routes(&self) -> Vec<Route> {
        let f = &self.features;
        [
            ("/", "Home", true),
            ("/about", "About", true),
            ("/blog", "Blog", f.blog),
            ("/projects", "Projects", f.projects),
            ("/notes", "Notes", f.notes),
            ("/resume", "Resume", f.resume),
        ]
        .into_iter()
        .filter(|(_, _, enabled)| *enabled)
        .map(|(path, name, _)| Route {
            path: path.to_string(),
            name: name.to_string(),
        })
        .collect()
    }
}

/// A navigable route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: String,
    pub name: String,
}

/// Per-category switches
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub blog: bool,
    pub projects: bool,
    pub notes: bool,
    pub resume: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            blog: true,
            projects: true,
            notes: true,
            resume: true,
        }
    }
}

impl FeatureFlags {
    /// Whether a content category is exposed at all
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Post => self.blog,
            Category::Note => self.notes,
            Category::Project => self.projects,
        }
    }
}

/// Project display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectSettings {
    pub featured_count: usize,
    pub show_years_on_card: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            featured_count: 6,
            show_years_on_card: true,
        }
    }
}

/// Blog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogSettings {
    pub posts_per_page: usize,
    pub featured_posts_count: usize,
    pub categories: Vec<String>,
    pub default_category: String,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            featured_posts_count: 3,
            categories: ["technical", "personal", "philosophy", "projects"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_category: "personal".to_string(),
        }
    }
}

/// Notes settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotesSettings {
    pub notes_per_page: usize,
    pub types_order: Vec<String>,
}

impl Default for NotesSettings {
    fn default() -> Self {
        Self {
            notes_per_page: 20,
            types_order: ["note", "snippet", "tip"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Build and cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Revalidation window (seconds) for long-lived processes
    pub revalidate: u64,
    /// Where manifests and the config snapshot are written
    pub output_dir: String,
    /// Public asset root
    pub public_dir: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            revalidate: 3600,
            output_dir: "generated".to_string(),
            public_dir: "public".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = SiteSettings::default();
        assert!(settings.features.blog);
        assert_eq!(settings.blog.featured_posts_count, 3);
        assert_eq!(settings.projects.featured_count, 6);
        assert_eq!(settings.build.revalidate, 3600);
    }

    #[test]
    fn test_parse_settings() {
        let yaml = r#"
features:
  notes: false
blog:
  featuredPostsCount: 5
build:
  output_dir: out
"#;
        let settings: SiteSettings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.features.blog);
        assert!(!settings.features.notes);
        assert_eq!(settings.blog.featured_posts_count, 5);
        assert_eq!(settings.blog.posts_per_page, 10);
        assert_eq!(settings.build.output_dir, "out");
    }

    #[test]
    fn test_enabled_routes_follow_flags() {
        let mut settings = SiteSettings::default();
        settings.features.notes = false;
        settings.features.resume = false;

        let paths: Vec<_> = settings
            .enabled_routes()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["/", "/about", "/blog", "/projects"]);
    }

    #[test]
    fn test_flags_map_categories() {
        let flags = FeatureFlags {
            blog: false,
            ..Default::default()
        };
        assert!(!flags.is_enabled(Category::Post));
        assert!(flags.is_enabled(Category::Note));
        assert!(flags.is_enabled(Category::Project));
    }
}
