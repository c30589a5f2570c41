//! Process environment descriptor
//!
//! Everything the pipeline would otherwise read from environment variables is
//! captured once here and passed down explicitly.

use std::fmt;

/// Default GitHub REST endpoint used for repository metrics
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Build/run mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

/// Where the pipeline is executing
///
/// `Browser` models a client-side build where neither the filesystem nor
/// outbound requests are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    #[default]
    Server,
    Browser,
}

impl ExecutionContext {
    /// Whether local-store and network reads are allowed
    pub fn allows_io(&self) -> bool {
        matches!(self, ExecutionContext::Server)
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionContext::Server => f.write_str("server"),
            ExecutionContext::Browser => f.write_str("browser"),
        }
    }
}

/// Environment resolved once at process start
#[derive(Debug, Clone)]
pub struct Environment {
    pub mode: Mode,
    pub context: ExecutionContext,
    /// Override for the remote configuration document
    pub content_config_url: Option<String>,
    /// Credential for repository metrics enrichment
    pub github_token: Option<String>,
    pub github_api_url: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            mode: Mode::Development,
            context: ExecutionContext::Server,
            content_config_url: None,
            github_token: None,
            github_api_url: GITHUB_API_URL.to_string(),
        }
    }
}

impl Environment {
    /// Read `FOLIO_ENV`, `CONTENT_CONFIG_URL`, `GITHUB_TOKEN` and `GITHUB_API_URL`
    pub fn from_env() -> Self {
        let mode = match std::env::var("FOLIO_ENV").as_deref() {
            Ok("production") | Ok("prod") => Mode::Production,
            _ => Mode::Development,
        };

        Self {
            mode,
            context: ExecutionContext::Server,
            content_config_url: non_empty_var("CONTENT_CONFIG_URL"),
            github_token: non_empty_var("GITHUB_TOKEN"),
            github_api_url: non_empty_var("GITHUB_API_URL")
                .unwrap_or_else(|| GITHUB_API_URL.to_string()),
        }
    }

    pub fn production() -> Self {
        Self {
            mode: Mode::Production,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_content_config_url(mut self, url: impl Into<String>) -> Self {
        self.content_config_url = Some(url.into());
        self
    }

    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    pub fn with_github_api_url(mut self, url: impl Into<String>) -> Self {
        self.github_api_url = url.into();
        self
    }

    pub fn is_production(&self) -> bool {
        self.mode == Mode::Production
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
