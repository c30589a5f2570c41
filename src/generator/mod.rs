//! Generator module - precomputes manifests and mirrors content assets
//!
//! Runs once per build. Each step is independent: a step that fails is
//! logged and skipped so the build as a whole still succeeds. Only failing
//! to create the output directory is fatal.

mod assets;
pub mod sitemap;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::config::ContentConfig;
use crate::content::loader::load_collection;
use crate::content::{Category, Collection, ContentItem};
use crate::Site;

pub use assets::mirror_assets;

/// Config snapshot file name inside the output directory
pub const CONFIG_SNAPSHOT_FILE: &str = "content-config.json";

/// Summary of one item, as stored in a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub category: Category,
}

impl From<&ContentItem> for ManifestEntry {
    fn from(item: &ContentItem) -> Self {
        Self {
            slug: item.slug.clone(),
            title: item.title.clone(),
            date: Some(item.date.clone()).filter(|d| !d.is_empty()),
            description: Some(item.description.clone()).filter(|d| !d.is_empty()),
            category: item.category,
        }
    }
}

/// Slug → summary, in listing order
pub type Manifest = IndexMap<String, ManifestEntry>;

pub fn manifest_file_name(collection: Collection) -> String {
    format!("{}-manifest.json", collection.dir_name())
}

/// Build a manifest from already-normalized items
pub fn build_manifest(items: &[ContentItem]) -> Manifest {
    items
        .iter()
        .map(|item| (item.slug.clone(), ManifestEntry::from(item)))
        .collect()
}

/// Read a manifest written by a previous build; `None` if absent or invalid
pub async fn load_manifest(path: &Path) -> Option<Manifest> {
    let content = tokio::fs::read_to_string(path).await.ok()?;
    match serde_json::from_str(&content) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            tracing::warn!("Ignoring invalid manifest {:?}: {}", path, e);
            None
        }
    }
}

/// Outcome of a build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Entries written per manifest; `None` when the step was skipped
    pub posts: Option<usize>,
    pub notes: Option<usize>,
    pub config_snapshot: bool,
    pub assets_mirrored: usize,
    pub sitemap: bool,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated manifests: posts ({}) | notes ({}) | config snapshot {} | assets mirrored {}",
            self.posts.unwrap_or(0),
            self.notes.unwrap_or(0),
            if self.config_snapshot { "updated" } else { "skipped" },
            self.assets_mirrored
        )
    }
}

/// One-shot build over a site
pub struct ManifestGenerator<'a> {
    site: &'a Site,
}

impl<'a> ManifestGenerator<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Run every build step
    pub async fn run(&self) -> Result<BuildReport> {
        let output_dir = &self.site.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

        let (posts, notes) = tokio::join!(
            self.collect(Collection::Posts),
            self.collect(Collection::Notes)
        );

        let (posts_written, notes_written) = tokio::join!(
            self.write_manifest(Collection::Posts, posts.as_deref()),
            self.write_manifest(Collection::Notes, notes.as_deref())
        );

        let config_snapshot = self.snapshot_config().await;
        let assets_mirrored = self.sync_public_assets().await;

        let sitemap = self
            .write_sitemap(posts.as_deref().unwrap_or(&[]), notes.as_deref().unwrap_or(&[]))
            .await;

        Ok(BuildReport {
            posts: posts_written,
            notes: notes_written,
            config_snapshot,
            assets_mirrored,
            sitemap,
        })
    }

    /// Re-derive a collection from disk, bypassing any memoized listing
    async fn collect(&self, collection: Collection) -> Option<Vec<ContentItem>> {
        let dir = self.site.content_dir.join(collection.dir_name());
        match load_collection(dir, collection).await {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!("Skipping {}: unable to read directory: {}", collection.dir_name(), e);
                None
            }
        }
    }

    async fn write_manifest(
        &self,
        collection: Collection,
        items: Option<&[ContentItem]>,
    ) -> Option<usize> {
        let path = self.site.output_dir.join(manifest_file_name(collection));
        // A skipped collection still overwrites any manifest from an earlier build
        let manifest = items.map(build_manifest).unwrap_or_default();

        match write_json(&path, &manifest).await {
            Ok(()) => {
                tracing::debug!("Wrote {:?}", path);
                items.map(|_| manifest.len())
            }
            Err(e) => {
                tracing::warn!("Unable to write {:?}: {}", path, e);
                None
            }
        }
    }

    /// Validate the local config document and copy it into the output dir
    async fn snapshot_config(&self) -> bool {
        match self.try_snapshot_config().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Unable to snapshot content config: {:#}", e);
                false
            }
        }
    }

    async fn try_snapshot_config(&self) -> Result<()> {
        let source = self.site.content_dir.join(crate::config::resolver::CONFIG_FILE);
        let target = self.site.output_dir.join(CONFIG_SNAPSHOT_FILE);

        let content = tokio::fs::read_to_string(&source).await?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        ContentConfig::deserialize(&value).context("incomplete content config")?;
        write_json(&target, &value).await
    }

    async fn sync_public_assets(&self) -> usize {
        let source = self.site.content_dir.join("public");
        let public_dir = self.site.public_dir.clone();

        let joined = tokio::task::spawn_blocking(move || mirror_assets(&source, &public_dir)).await;
        match joined {
            Ok(Ok(count)) => count,
            Ok(Err(e)) => {
                tracing::warn!("Unable to sync content assets into public directory: {:#}", e);
                0
            }
            Err(e) => {
                tracing::warn!("Asset sync task failed: {}", e);
                0
            }
        }
    }

    async fn write_sitemap(&self, posts: &[ContentItem], notes: &[ContentItem]) -> bool {
        match self.try_write_sitemap(posts, notes).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Unable to write sitemap: {:#}", e);
                false
            }
        }
    }

    async fn try_write_sitemap(&self, posts: &[ContentItem], notes: &[ContentItem]) -> Result<()> {
        let config = self.site.resolve_config().await?;
        let features = self.site.features();
        let posts = if features.blog { posts } else { &[] };
        let notes = if features.notes { notes } else { &[] };

        let entries = sitemap::sitemap_entries(
            config.website_url(),
            &self.site.settings.enabled_routes(),
            posts,
            notes,
            chrono::Utc::now().date_naive(),
        );

        tokio::fs::create_dir_all(&self.site.public_dir).await?;
        tokio::fs::write(
            self.site.public_dir.join("sitemap.xml"),
            sitemap::render_sitemap(&entries),
        )
        .await?;
        tokio::fs::write(
            self.site.public_dir.join("robots.txt"),
            sitemap::render_robots(config.website_url()),
        )
        .await?;
        Ok(())
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = format!("{}\n", serde_json::to_string_pretty(value)?);
    tokio::fs::write(path, contents).await?;
    Ok(())
}
