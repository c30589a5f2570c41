//! Best-effort project enrichment from code-hosting APIs

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio::task::JoinSet;

use super::Project;
use crate::config::Environment;
use crate::error::{Error, Result};

/// A decorator that derives an enriched copy of a project
#[async_trait]
pub trait ProjectEnricher: Send + Sync {
    /// Enriched copy, or `None` when the project is not applicable
    async fn enrich(&self, project: &Project) -> Result<Option<Project>>;
}

/// Star counts from the GitHub REST API
pub struct GitHubStars {
    api_url: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    stargazers_count: u64,
}

impl GitHubStars {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the enricher when the environment grants the capability
    ///
    /// Enrichment only happens in production with a configured token;
    /// anywhere else this returns `None` and listings are left untouched.
    pub fn from_env(env: &Environment) -> Option<Arc<dyn ProjectEnricher>> {
        if !env.is_production() {
            return None;
        }

        match &env.github_token {
            Some(token) => Some(Arc::new(Self::new(&env.github_api_url, token))),
            None => {
                tracing::warn!("No GITHUB_TOKEN provided. GitHub stars will not be fetched.");
                None
            }
        }
    }
}

#[async_trait]
impl ProjectEnricher for GitHubStars {
    async fn enrich(&self, project: &Project) -> Result<Option<Project>> {
        let Some((owner, repo)) = github_repo(&project.href) else {
            return Ok(None);
        };

        let url = format!(
            "{}/repos/{}/{}",
            self.api_url.trim_end_matches('/'),
            owner,
            repo
        );
        tracing::debug!("Fetching repository metrics from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", concat!("folio-rs/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let data: RepoResponse = response.json().await?;
        Ok(Some(Project {
            stars: Some(data.stargazers_count),
            ..project.clone()
        }))
    }
}

/// `(owner, repo)` for `https://github.com/<owner>/<repo>[/...]`
pub fn github_repo(href: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = href.split('/').collect();
    if parts.len() < 5 || parts[2] != "github.com" {
        return None;
    }

    let owner = parts[3];
    let repo = parts[4].trim_end_matches(".git");
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Enrich every project concurrently; failures keep the original record
pub async fn enrich_all(enricher: Arc<dyn ProjectEnricher>, projects: Vec<Project>) -> Vec<Project> {
    let mut tasks = JoinSet::new();
    for (index, project) in projects.iter().cloned().enumerate() {
        let enricher = Arc::clone(&enricher);
        tasks.spawn(async move {
            let result = enricher.enrich(&project).await;
            (index, project, result)
        });
    }

    let mut enriched = projects;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(Some(project)))) => enriched[index] = project,
            Ok((_, _, Ok(None))) => {}
            Ok((_, project, Err(e))) => {
                tracing::warn!("Error fetching metrics for {}: {}", project.title, e);
            }
            Err(e) => tracing::warn!("Enrichment task failed: {}", e),
        }
    }

    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use crate::content::Category;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn project(title: &str, href: &str) -> Project {
        Project {
            title: title.to_string(),
            description: String::new(),
            href: href.to_string(),
            role: String::new(),
            years: vec!["2025".to_string()],
            featured: false,
            stars: None,
            category: Category::Project,
        }
    }

    #[test]
    fn test_github_repo() {
        assert_eq!(
            github_repo("https://github.com/arvinsingh/ELISA"),
            Some(("arvinsingh".to_string(), "ELISA".to_string()))
        );
        assert_eq!(
            github_repo("https://github.com/a/b.git"),
            Some(("a".to_string(), "b".to_string()))
        );
        assert_eq!(github_repo("/blog/fluency-analyzer-app"), None);
        assert_eq!(github_repo("https://gitlab.com/a/b"), None);
        assert_eq!(github_repo("https://github.com/a"), None);
    }

    #[test]
    fn test_capability_requires_production_and_token() {
        let dev = Environment::default().with_github_token("t");
        assert!(GitHubStars::from_env(&dev).is_none());

        let prod_no_token = Environment::default().with_mode(Mode::Production);
        assert!(GitHubStars::from_env(&prod_no_token).is_none());

        let prod = Environment::production().with_github_token("t");
        assert!(GitHubStars::from_env(&prod).is_some());
    }

    #[tokio::test]
    async fn test_enrichment_sets_stars() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/u/good"))
            .and(header("Authorization", "token secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "stargazers_count": 42 })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/u/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let enricher: Arc<dyn ProjectEnricher> = Arc::new(GitHubStars::new(server.uri(), "secret"));
        let projects = vec![
            project("Good", "https://github.com/u/good"),
            project("Broken", "https://github.com/u/broken"),
            project("Local", "/blog/local"),
        ];

        let enriched = enrich_all(enricher, projects.clone()).await;
        assert_eq!(enriched[0].stars, Some(42));
        assert_eq!(enriched[1], projects[1]);
        assert_eq!(enriched[2], projects[2]);
    }

    #[tokio::test]
    async fn test_network_error_leaves_record_unchanged() {
        // Nothing listens on the discard port
        let enricher: Arc<dyn ProjectEnricher> =
            Arc::new(GitHubStars::new("http://127.0.0.1:9", "secret"));
        let projects = vec![project("Offline", "https://github.com/u/offline")];

        let enriched = enrich_all(enricher, projects).await;
        assert_eq!(enriched.len(), 1);
        assert!(enriched[0].stars.is_none());
    }
}
