//! folio-rs: content resolution and aggregation for a personal website
//!
//! This crate resolves a site's personal configuration through a fallback
//! chain, reads posts, notes and projects from a content store, and produces
//! the sorted, filtered and feature-gated collections that presentation code
//! renders. A build step precomputes manifests and mirrors content assets.

pub mod aggregate;
pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod projects;
pub mod server;
pub mod watch;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use aggregate::Aggregator;
use config::{
    ConfigResolver, ContentConfig, Environment, FeatureFlags, RepoConfig, ResumeInfo,
    SiteSettings,
};
use content::{Category, Collection, ContentItem, ContentReader};
use generator::Manifest;
use projects::{GitHubStars, Project, ProjectCatalog, ProjectEnricher};

/// Site settings file, relative to the site root
pub const SETTINGS_FILE: &str = "site.yml";
/// Repository descriptor file, relative to the site root
pub const REPO_FILE: &str = "repo.config.json";

/// The application context
///
/// Owns every memoized resource of the pipeline. Consumers receive it by
/// reference (or `Arc`) rather than through global state.
pub struct Site {
    /// Environment captured at start-up
    pub env: Environment,
    /// Feature flags and thresholds
    pub settings: SiteSettings,
    /// Repository descriptor
    pub repo: RepoConfig,
    /// Site root
    pub base_dir: PathBuf,
    /// Content root (posts/, notes/, projects.json, config.json, public/)
    pub content_dir: PathBuf,
    /// Public asset root
    pub public_dir: PathBuf,
    /// Build output (manifests, config snapshot)
    pub output_dir: PathBuf,

    enricher: Option<Arc<dyn ProjectEnricher>>,
    revalidate: Option<Duration>,
    config: ConfigResolver,
    content: ContentReader,
    projects: ProjectCatalog,
}

impl Site {
    /// Create a site from a directory, reading `site.yml` and `repo.config.json` when present
    pub fn new<P: AsRef<Path>>(base_dir: P, env: Environment) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        let settings_path = base_dir.join(SETTINGS_FILE);
        let settings = if settings_path.exists() {
            SiteSettings::load(&settings_path)?
        } else {
            SiteSettings::default()
        };

        let repo_path = base_dir.join(REPO_FILE);
        let repo = if repo_path.exists() {
            RepoConfig::load(&repo_path)?
        } else {
            RepoConfig::default()
        };

        Ok(Self::from_parts(base_dir, env, settings, repo))
    }

    /// Create a site from already-loaded parts
    pub fn from_parts(
        base_dir: PathBuf,
        env: Environment,
        settings: SiteSettings,
        repo: RepoConfig,
    ) -> Self {
        let content_dir = content::path::content_dir(&base_dir, &env, &repo);
        let public_dir = base_dir.join(&settings.build.public_dir);
        let output_dir = base_dir.join(&settings.build.output_dir);
        let enricher = GitHubStars::from_env(&env);

        Self {
            config: ConfigResolver::for_site(&env, &repo, &content_dir),
            content: ContentReader::new(&content_dir),
            projects: ProjectCatalog::new(&content_dir).with_enricher(enricher.clone()),
            env,
            settings,
            repo,
            base_dir,
            content_dir,
            public_dir,
            output_dir,
            enricher,
            revalidate: None,
        }
    }

    /// Expire memoized data after `build.revalidate` seconds
    pub fn with_revalidate(mut self) -> Self {
        self.revalidate = Some(Duration::from_secs(self.settings.build.revalidate));
        self.rebuild();
        self
    }

    /// Replace the project enrichment step
    pub fn with_project_enricher(mut self, enricher: Option<Arc<dyn ProjectEnricher>>) -> Self {
        self.enricher = enricher;
        self.rebuild();
        self
    }

    fn rebuild(&mut self) {
        let mut config = ConfigResolver::for_site(&self.env, &self.repo, &self.content_dir);
        let mut content = ContentReader::new(&self.content_dir);
        let mut projects =
            ProjectCatalog::new(&self.content_dir).with_enricher(self.enricher.clone());

        if let Some(ttl) = self.revalidate {
            config = config.with_revalidate(ttl);
            content = content.with_revalidate(ttl);
            projects = projects.with_revalidate(ttl);
        }

        self.config = config;
        self.content = content;
        self.projects = projects;
    }

    /// Resolve the content configuration (memoized)
    pub async fn resolve_config(&self) -> Result<Arc<ContentConfig>> {
        self.config.resolve().await
    }

    pub fn features(&self) -> &FeatureFlags {
        &self.settings.features
    }

    /// Fail with `CategoryDisabled` when a category is switched off
    pub fn gate(&self, category: Category) -> Result<()> {
        if self.settings.features.is_enabled(category) {
            Ok(())
        } else {
            tracing::debug!("{} content is disabled", category);
            Err(Error::CategoryDisabled(category))
        }
    }

    /// Ungated reader, for build steps and tooling
    pub fn reader(&self) -> &ContentReader {
        &self.content
    }

    /// Ungated project catalog
    pub fn catalog(&self) -> &ProjectCatalog {
        &self.projects
    }

    /// Published items of a collection, if its category is enabled
    pub async fn list(&self, collection: Collection) -> Result<Arc<Vec<ContentItem>>> {
        self.gate(collection.category())?;
        self.content.list(collection).await
    }

    /// A single item by slug, if its category is enabled
    pub async fn item(&self, collection: Collection, slug: &str) -> Result<ContentItem> {
        self.gate(collection.category())?;
        self.content
            .get(collection, slug)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} '{}'", collection.category(), slug)))
    }

    /// The project list, if projects are enabled
    pub async fn projects(&self) -> Result<Arc<Vec<Project>>> {
        self.gate(Category::Project)?;
        self.projects.list().await
    }

    /// Resume metadata, if the resume page is enabled
    pub async fn resume(&self) -> Result<ResumeInfo> {
        if !self.settings.features.resume {
            return Err(Error::NotFound("resume is disabled".to_string()));
        }
        Ok(self.resolve_config().await?.resume.clone())
    }

    /// Slug summaries for a collection
    ///
    /// Uses the manifest written by the build step when one exists, and
    /// derives the summaries from the content files otherwise.
    pub async fn summaries(&self, collection: Collection) -> Result<Manifest> {
        self.gate(collection.category())?;

        let path = self.output_dir.join(generator::manifest_file_name(collection));
        if let Some(manifest) = generator::load_manifest(&path).await {
            return Ok(manifest);
        }

        let items = self.content.list(collection).await?;
        Ok(generator::build_manifest(&items))
    }

    /// Forget every memoized resource; the next access re-reads the store
    pub async fn invalidate(&self) {
        tokio::join!(
            self.config.invalidate(),
            self.content.invalidate(),
            self.projects.invalidate()
        );
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(self)
    }
}
