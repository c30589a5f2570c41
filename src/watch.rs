//! Debounced file watching for `build --watch` and `serve --watch`

use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Live watch over a set of paths
///
/// Dropping it stops the underlying watcher.
pub struct ContentWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    rx: mpsc::UnboundedReceiver<Vec<PathBuf>>,
}

impl ContentWatcher {
    /// Watch every existing path recursively; missing paths are skipped
    pub fn new(paths: &[&Path]) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        // Avoid multiple rapid rebuilds
        let mut debouncer = new_debouncer(
            Duration::from_millis(500),
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let changed: Vec<PathBuf> = events
                        .into_iter()
                        .map(|e| e.path)
                        .filter(|p| is_relevant(p))
                        .collect();
                    if !changed.is_empty() {
                        let _ = tx.send(changed);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
        )?;

        for path in paths {
            if path.exists() {
                debouncer.watcher().watch(path, RecursiveMode::Recursive)?;
                tracing::debug!("Watching: {:?}", path);
            }
        }

        Ok(Self {
            _debouncer: debouncer,
            rx,
        })
    }

    /// Wait for the next batch of changed paths
    pub async fn changed(&mut self) -> Option<Vec<PathBuf>> {
        self.rx.recv().await
    }
}

/// Filter out editor and VCS noise
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.contains("node_modules")
        && !path_str.ends_with('~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("content/posts/a.md")));
        assert!(!is_relevant(Path::new("content/.git/index")));
        assert!(!is_relevant(Path::new("content/posts/a.md~")));
    }
}
