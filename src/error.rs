//! Error types for the content pipeline

use thiserror::Error;

use crate::config::ExecutionContext;
use crate::content::Category;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the content pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// The category is switched off by its feature flag
    #[error("{0} content is disabled")]
    CategoryDisabled(Category),

    /// A lookup found nothing
    #[error("not found: {0}")]
    NotFound(String),

    /// A server-only path was invoked from a context that cannot do I/O
    #[error("{operation} cannot be called from a {context} context")]
    Misuse {
        operation: &'static str,
        context: ExecutionContext,
    },

    #[error("front-matter error: {0}")]
    FrontMatter(String),

    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether a caller should present this as a missing resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::CategoryDisabled(_) | Error::NotFound(_))
    }
}
