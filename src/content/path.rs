//! Content directory location

use std::path::{Path, PathBuf};

use crate::config::{Environment, RepoConfig};

/// Locate the content root for a site
///
/// Outside production a sibling checkout of the content repository
/// (`../<content repo name>`) takes precedence, so authors can edit content
/// next to the site. Otherwise the bundled checkout inside the site is used.
pub fn content_dir(base_dir: &Path, env: &Environment, repo: &RepoConfig) -> PathBuf {
    if !env.is_production() {
        if let Some(parent) = base_dir.parent() {
            let sibling = parent.join(&repo.content.name);
            if sibling.is_dir() {
                tracing::debug!("Using sibling content checkout at {:?}", sibling);
                return sibling;
            }
        }
    }

    base_dir.join(&repo.content.submodule_path)
}
