//! Project catalog (projects.json)

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::enrich::ProjectEnricher;
use crate::cache::Memo;
use crate::content::Category;
use crate::error::Result;

/// Catalog file name inside the content root
pub const PROJECTS_FILE: &str = "projects.json";

/// A year as authored: `2019` or `"2019"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

impl YearValue {
    fn normalize(&self) -> String {
        match self {
            YearValue::Number(n) => n.to_string(),
            YearValue::Text(s) => s.trim().to_string(),
        }
    }
}

/// Project record as stored in the catalog file
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub years: Vec<YearValue>,
    #[serde(default)]
    pub featured: bool,
}

/// A normalized project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub href: String,
    pub role: String,
    pub years: Vec<String>,
    pub featured: bool,
    /// Popularity metric from the code host, when enrichment succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(rename = "type")]
    pub category: Category,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Self {
            title: record.title.trim().to_string(),
            description: record.description.trim().to_string(),
            href: record.href.trim().to_string(),
            role: record.role.trim().to_string(),
            years: record.years.iter().map(YearValue::normalize).collect(),
            featured: record.featured,
            stars: None,
            category: Category::Project,
        }
    }
}

impl Project {
    /// Most recent numeric year, if any
    pub fn latest_year(&self) -> Option<i32> {
        self.years.iter().filter_map(|y| y.parse::<i32>().ok()).max()
    }

    /// Whether any lower-cased term occurs in title, description or role
    pub fn matches_any(&self, terms: &[String]) -> bool {
        let title = self.title.to_lowercase();
        let description = self.description.to_lowercase();
        let role = self.role.to_lowercase();
        terms.iter().any(|term| {
            title.contains(term.as_str())
                || description.contains(term.as_str())
                || role.contains(term.as_str())
        })
    }
}

/// Featured first, then most recent year; ties keep catalog order
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
        b.featured
            .cmp(&a.featured)
            .then_with(|| b.latest_year().cmp(&a.latest_year()))
    });
}

/// Parse a catalog document, skipping malformed records
pub fn parse_catalog(json: &str) -> Result<Vec<Project>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut projects = Vec::with_capacity(values.len());

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<ProjectRecord>(value) {
            Ok(record) => projects.push(Project::from(record)),
            Err(e) => tracing::warn!("Skipping project #{}: {}", index, e),
        }
    }

    sort_projects(&mut projects);
    Ok(projects)
}

/// Loads, normalizes and optionally enriches the project list
pub struct ProjectCatalog {
    path: PathBuf,
    enricher: Option<Arc<dyn ProjectEnricher>>,
    memo: Memo<Vec<Project>>,
}

impl ProjectCatalog {
    pub fn new(content_dir: &Path) -> Self {
        Self {
            path: content_dir.join(PROJECTS_FILE),
            enricher: None,
            memo: Memo::new(),
        }
    }

    /// Decorate every listing with an enrichment step
    pub fn with_enricher(mut self, enricher: Option<Arc<dyn ProjectEnricher>>) -> Self {
        self.enricher = enricher;
        self
    }

    pub fn with_revalidate(mut self, ttl: Duration) -> Self {
        self.memo = Memo::with_ttl(ttl);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The sorted project list
    pub async fn list(&self) -> Result<Arc<Vec<Project>>> {
        self.memo.get_or_try_init(|| self.load()).await
    }

    /// Drop the memoized list
    pub async fn invalidate(&self) {
        self.memo.invalidate().await;
    }

    async fn load(&self) -> Result<Vec<Project>> {
        let projects = self.load_base().await?;
        match &self.enricher {
            Some(enricher) => Ok(super::enrich::enrich_all(Arc::clone(enricher), projects).await),
            None => Ok(projects),
        }
    }

    async fn load_base(&self) -> Result<Vec<Project>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Project catalog not found at: {:?}", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        match parse_catalog(&content) {
            Ok(projects) => Ok(projects),
            Err(e) => {
                tracing::warn!("Unable to parse project catalog {:?}: {}", self.path, e);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        { "title": "ELISA", "description": "Fake news", "href": "https://github.com/u/ELISA",
          "role": "MLOps Engineer", "years": ["2018", "2019"] },
        { "title": "CymruFluency", "description": "Welsh fluency", "href": "https://github.com/u/CymruFluency",
          "role": "Lead Researcher", "years": [2025] },
        { "title": "Broken", "years": "not-a-list" },
        { "title": "Pinned", "description": "Old but featured", "href": "/blog/pinned",
          "role": "Author", "years": [" 2015 "], "featured": true },
        { "title": "Undated", "description": "", "href": "", "role": "", "years": [] }
    ]"#;

    #[test]
    fn test_parse_normalizes_and_sorts() {
        let projects = parse_catalog(CATALOG).unwrap();
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Pinned", "CymruFluency", "ELISA", "Undated"]);

        assert_eq!(projects[0].years, vec!["2015"]);
        assert_eq!(projects[1].years, vec!["2025"]);
        assert_eq!(projects[2].latest_year(), Some(2019));
        assert!(projects.iter().all(|p| p.stars.is_none()));
    }

    #[test]
    fn test_project_search_includes_role() {
        let projects = parse_catalog(CATALOG).unwrap();
        let terms = vec!["mlops".to_string()];
        let hits: Vec<_> = projects.iter().filter(|p| p.matches_any(&terms)).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "ELISA");
    }

    #[tokio::test]
    async fn test_missing_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ProjectCatalog::new(dir.path());
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECTS_FILE), "{ nope").unwrap();
        let catalog = ProjectCatalog::new(dir.path());
        assert!(catalog.list().await.unwrap().is_empty());
    }
}
