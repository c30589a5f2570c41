//! Content configuration resolver
//!
//! Resolves one [`ContentConfig`] through an ordered chain of providers. The
//! first provider that yields a complete document wins; when every provider
//! fails the built-in default is used. The result is memoized on the resolver.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::{ContentConfig, Environment, ExecutionContext, RepoConfig};
use crate::cache::Memo;
use crate::error::{Error, Result};

/// Name of the configuration document in the content store
pub const CONFIG_FILE: &str = "config.json";

/// A source of the configuration document
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Short label used in diagnostics
    fn name(&self) -> &str;

    /// Load a complete configuration, or report why it could not
    async fn load(&self) -> Result<ContentConfig>;
}

/// Reads `config.json` from the local content directory
pub struct LocalStoreProvider {
    path: PathBuf,
}

impl LocalStoreProvider {
    pub fn new(content_dir: &Path) -> Self {
        Self {
            path: content_dir.join(CONFIG_FILE),
        }
    }
}

#[async_trait]
impl ConfigProvider for LocalStoreProvider {
    fn name(&self) -> &str {
        "local store"
    }

    async fn load(&self) -> Result<ContentConfig> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(ContentConfig::from_json(&content)?)
    }
}

/// Fetches the configuration document over HTTP
pub struct RemoteStoreProvider {
    url: String,
    client: reqwest::Client,
}

impl RemoteStoreProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ConfigProvider for RemoteStoreProvider {
    fn name(&self) -> &str {
        "remote store"
    }

    async fn load(&self) -> Result<ContentConfig> {
        tracing::debug!("Fetching content config from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let body = response.text().await?;
        Ok(ContentConfig::from_json(&body)?)
    }
}

/// Memoized provider chain
pub struct ConfigResolver {
    context: ExecutionContext,
    providers: Vec<Box<dyn ConfigProvider>>,
    memo: Memo<ContentConfig>,
}

impl ConfigResolver {
    /// Create a resolver over an explicit provider chain
    pub fn new(context: ExecutionContext, providers: Vec<Box<dyn ConfigProvider>>) -> Self {
        Self {
            context,
            providers,
            memo: Memo::new(),
        }
    }

    /// Standard chain: local content dir, then the remote document
    pub fn for_site(env: &Environment, repo: &RepoConfig, content_dir: &Path) -> Self {
        let remote_url = env
            .content_config_url
            .clone()
            .unwrap_or_else(|| repo.content_file_url(CONFIG_FILE));

        Self::new(
            env.context,
            vec![
                Box::new(LocalStoreProvider::new(content_dir)),
                Box::new(RemoteStoreProvider::new(remote_url)),
            ],
        )
    }

    /// Re-resolve after `ttl` instead of keeping the first result forever
    pub fn with_revalidate(mut self, ttl: Duration) -> Self {
        self.memo = Memo::with_ttl(ttl);
        self
    }

    /// Resolve the configuration
    ///
    /// Never fails because a source is unavailable; only fails when called
    /// from an execution context that cannot perform I/O.
    pub async fn resolve(&self) -> Result<Arc<ContentConfig>> {
        if !self.context.allows_io() {
            return Err(Error::Misuse {
                operation: "resolving the content config",
                context: self.context,
            });
        }

        Ok(self.memo.get_or_init(|| self.run_chain()).await)
    }

    async fn run_chain(&self) -> ContentConfig {
        for provider in &self.providers {
            match provider.load().await {
                Ok(config) => {
                    tracing::debug!("Content config loaded from {}", provider.name());
                    return config;
                }
                Err(e) => {
                    tracing::warn!(
                        "Unable to load content config from {}: {}",
                        provider.name(),
                        e
                    );
                }
            }
        }

        tracing::warn!("Falling back to default content configuration");
        ContentConfig::default()
    }

    /// Drop the memoized configuration
    pub async fn invalidate(&self) {
        self.memo.invalidate().await;
    }
}
