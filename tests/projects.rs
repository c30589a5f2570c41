mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{fixture, site, OFFLINE_CONFIG_URL};
use folio_rs::config::{Environment, RepoConfig, SiteSettings};
use folio_rs::projects::{Project, ProjectEnricher};
use folio_rs::{Error, Result, Site};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Unreachable;

#[async_trait]
impl ProjectEnricher for Unreachable {
    async fn enrich(&self, _project: &Project) -> Result<Option<Project>> {
        Err(Error::NotFound("metrics service".to_string()))
    }
}

fn titles(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|p| p.title.as_str()).collect()
}

#[tokio::test]
async fn test_failing_enricher_keeps_catalog_records() {
    let (temp, _) = fixture();
    let site = site(temp.path()).with_project_enricher(Some(Arc::new(Unreachable)));

    let projects = site.projects().await.unwrap();
    assert_eq!(titles(&projects), vec!["CymruFluency", "ELISA"]);
    assert!(projects.iter().all(|p| p.stars.is_none()));
    assert_eq!(projects[1].years, vec!["2018", "2019"]);
}

#[tokio::test]
async fn test_production_site_fetches_stars() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/u/ELISA"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "stargazers_count": 7 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/u/CymruFluency"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (temp, _) = fixture();
    let env = Environment::production()
        .with_content_config_url(OFFLINE_CONFIG_URL)
        .with_github_token("secret")
        .with_github_api_url(server.uri());
    let site = Site::from_parts(
        temp.path().to_path_buf(),
        env,
        SiteSettings::default(),
        RepoConfig::default(),
    );

    let projects = site.projects().await.unwrap();
    assert_eq!(titles(&projects), vec!["CymruFluency", "ELISA"]);
    assert_eq!(projects[0].stars, None);
    assert_eq!(projects[1].stars, Some(7));

    // The enriched listing is memoized
    let again = site.projects().await.unwrap();
    assert!(Arc::ptr_eq(&projects, &again));
}
