//! Content item models

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::frontmatter::parse_date_string;

/// Kind of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Post,
    Note,
    Project,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Post => "post",
            Category::Note => "note",
            Category::Project => "project",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File-backed content collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Notes,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Posts, Collection::Notes];

    /// Directory name inside the content root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Notes => "notes",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Collection::Posts => Category::Post,
            Collection::Notes => Category::Note,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "post" | "posts" | "blog" => Some(Collection::Posts),
            "note" | "notes" => Some(Collection::Notes),
            _ => None,
        }
    }
}

/// A post or note
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub title: String,

    pub description: String,

    /// Unique within its category
    pub slug: String,

    /// Date as authored
    pub date: String,

    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    pub published: bool,

    /// Raw markdown body
    pub body: String,

    #[serde(rename = "type")]
    pub category: Category,

    /// Parsed `date`; epoch when missing or unparseable
    #[serde(skip)]
    pub timestamp: DateTime<Utc>,

    #[serde(skip)]
    pub source: PathBuf,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl ContentItem {
    /// Create an item with minimal required fields
    pub fn new(category: Category, slug: impl Into<String>, date: impl Into<String>) -> Self {
        let slug = slug.into();
        let date = date.into();
        let timestamp = parse_date_string(&date).unwrap_or_default();
        Self {
            title: slug.clone(),
            description: String::new(),
            slug,
            date,
            tags: Vec::new(),
            last_modified: None,
            published: true,
            body: String::new(),
            category,
            timestamp,
            source: PathBuf::new(),
            extra: IndexMap::new(),
        }
    }

    /// Last modification time, falling back to the item's date
    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified
            .as_deref()
            .and_then(parse_date_string)
            .unwrap_or(self.timestamp)
    }

    /// Whether any lower-cased term occurs in the searchable fields
    pub fn matches_any(&self, terms: &[String]) -> bool {
        let title = self.title.to_lowercase();
        let description = self.description.to_lowercase();
        let tags: Vec<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();
        let body = match self.category {
            Category::Note => Some(self.body.to_lowercase()),
            _ => None,
        };

        terms.iter().any(|term| {
            title.contains(term.as_str())
                || description.contains(term.as_str())
                || tags.iter().any(|t| t.contains(term.as_str()))
                || body.as_ref().is_some_and(|b| b.contains(term.as_str()))
        })
    }
}

/// Sort newest first; equal dates keep their current order
pub fn sort_by_date_desc(items: &mut [ContentItem]) {
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_is_epoch() {
        let item = ContentItem::new(Category::Post, "x", "someday");
        assert_eq!(item.timestamp, DateTime::<Utc>::default());
    }

    #[test]
    fn test_last_modified_falls_back_to_date() {
        let mut item = ContentItem::new(Category::Note, "x", "2024-03-04");
        assert_eq!(
            item.last_modified_at().format("%Y-%m-%d").to_string(),
            "2024-03-04"
        );

        item.last_modified = Some("2024-05-06".to_string());
        assert_eq!(
            item.last_modified_at().format("%Y-%m-%d").to_string(),
            "2024-05-06"
        );
    }

    #[test]
    fn test_body_only_searched_for_notes() {
        let mut post = ContentItem::new(Category::Post, "p", "2024-01-01");
        post.body = "hidden keyword".to_string();
        let mut note = ContentItem::new(Category::Note, "n", "2024-01-01");
        note.body = "hidden keyword".to_string();

        let terms = vec!["keyword".to_string()];
        assert!(!post.matches_any(&terms));
        assert!(note.matches_any(&terms));
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut items = vec![
            ContentItem::new(Category::Post, "a", "2024-01-01"),
            ContentItem::new(Category::Post, "b", "2025-01-01"),
            ContentItem::new(Category::Post, "c", "2024-01-01"),
        ];
        sort_by_date_desc(&mut items);
        let slugs: Vec<_> = items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_category_serializes_as_type() {
        let item = ContentItem::new(Category::Note, "n", "2024-01-01");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "note");
        assert!(json.get("timestamp").is_none());
    }
}
