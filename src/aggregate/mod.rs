//! Cross-category views: recent content, search and summary statistics
//!
//! Every view goes through the site's feature gate. A category that is
//! disabled or fails to load contributes an empty list; the view itself
//! never fails.

use serde::Serialize;
use std::sync::Arc;

use crate::content::{sort_by_date_desc, Collection, ContentItem};
use crate::error::{Error, Result};
use crate::projects::Project;
use crate::Site;

/// Per-category search matches
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub posts: Vec<ContentItem>,
    pub projects: Vec<Project>,
    pub notes: Vec<ContentItem>,
    pub total: usize,
}

/// Totals and featured subsets
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub total_blog_posts: usize,
    pub total_projects: usize,
    pub total_notes: usize,
    pub featured_content: FeaturedContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedContent {
    pub posts: Vec<ContentItem>,
    pub projects: Vec<Project>,
}

/// Split a query into lower-cased whitespace-separated terms
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// Views over a site's content
pub struct Aggregator<'a> {
    site: &'a Site,
}

impl<'a> Aggregator<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    async fn collection(&self, collection: Collection) -> Arc<Vec<ContentItem>> {
        degrade(collection.dir_name(), self.site.list(collection).await)
    }

    async fn projects(&self) -> Arc<Vec<Project>> {
        degrade("projects", self.site.projects().await)
    }

    /// Posts and notes merged newest first, truncated to `limit`
    pub async fn recent_content(&self, limit: usize) -> Vec<ContentItem> {
        let (posts, notes) = tokio::join!(
            self.collection(Collection::Posts),
            self.collection(Collection::Notes)
        );

        let mut merged: Vec<ContentItem> = posts.iter().chain(notes.iter()).cloned().collect();
        sort_by_date_desc(&mut merged);
        merged.truncate(limit);
        merged
    }

    /// Items where any query term occurs in a searchable field
    pub async fn search_content(&self, query: &str) -> SearchResults {
        let terms = tokenize(query);
        if terms.is_empty() {
            return SearchResults::default();
        }

        let (posts, projects, notes) = tokio::join!(
            self.collection(Collection::Posts),
            self.projects(),
            self.collection(Collection::Notes)
        );

        let posts: Vec<ContentItem> = posts
            .iter()
            .filter(|p| p.matches_any(&terms))
            .cloned()
            .collect();
        let projects: Vec<Project> = projects
            .iter()
            .filter(|p| p.matches_any(&terms))
            .cloned()
            .collect();
        let notes: Vec<ContentItem> = notes
            .iter()
            .filter(|n| n.matches_any(&terms))
            .cloned()
            .collect();

        let total = posts.len() + projects.len() + notes.len();
        SearchResults {
            posts,
            projects,
            notes,
            total,
        }
    }

    /// Category totals and featured subsets
    pub async fn summary(&self) -> ContentSummary {
        let (posts, projects, notes) = tokio::join!(
            self.collection(Collection::Posts),
            self.projects(),
            self.collection(Collection::Notes)
        );

        let featured_posts = posts
            .iter()
            .take(self.site.settings.blog.featured_posts_count)
            .cloned()
            .collect();
        let featured_projects = projects
            .iter()
            .filter(|p| p.featured)
            .take(self.site.settings.projects.featured_count)
            .cloned()
            .collect();

        ContentSummary {
            total_blog_posts: posts.len(),
            total_projects: projects.len(),
            total_notes: notes.len(),
            featured_content: FeaturedContent {
                posts: featured_posts,
                projects: featured_projects,
            },
        }
    }
}

fn degrade<T>(label: &str, result: Result<Arc<Vec<T>>>) -> Arc<Vec<T>> {
    match result {
        Ok(items) => items,
        Err(Error::CategoryDisabled(_)) => Arc::new(Vec::new()),
        Err(e) => {
            tracing::warn!("Unable to load {}: {}", label, e);
            Arc::new(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  Welsh   FLUENCY "), vec!["welsh", "fluency"]);
        assert!(tokenize("   ").is_empty());
    }
}
