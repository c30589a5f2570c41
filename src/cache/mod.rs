//! In-process memoization for resolved configuration and content
//!
//! A [`Memo`] holds at most one computed value. The first caller runs the
//! initializer while holding an async lock, so concurrent callers wait for
//! that computation instead of repeating it. Failed initializations are not
//! stored; the next caller tries again.
//!
//! An optional time-to-live turns the memo into a revalidation window for
//! long-lived processes such as the development server.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

struct Entry<T> {
    value: Arc<T>,
    stored_at: Instant,
}

/// Single-flight memoized value
pub struct Memo<T> {
    slot: Mutex<Option<Entry<T>>>,
    ttl: Option<Duration>,
}

impl<T> Memo<T> {
    /// Create a memo that keeps its value for the process lifetime
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            ttl: None,
        }
    }

    /// Create a memo whose value is recomputed once `ttl` has elapsed
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl: Some(ttl),
        }
    }

    fn is_fresh(&self, entry: &Entry<T>) -> bool {
        match self.ttl {
            Some(ttl) => entry.stored_at.elapsed() < ttl,
            None => true,
        }
    }

    /// Return the cached value, or run `init` and cache its success
    pub async fn get_or_try_init<F, Fut, E>(&self, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            if self.is_fresh(entry) {
                return Ok(Arc::clone(&entry.value));
            }
            tracing::debug!("Memoized value expired, recomputing");
        }

        let value = Arc::new(init().await?);
        *slot = Some(Entry {
            value: Arc::clone(&value),
            stored_at: Instant::now(),
        });
        Ok(value)
    }

    /// Return the cached value, or run an infallible `init`
    pub async fn get_or_init<F, Fut>(&self, init: F) -> Arc<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let result: Result<Arc<T>, std::convert::Infallible> = self
            .get_or_try_init(|| async { Ok(init().await) })
            .await;
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Whether a fresh value is currently cached
    pub async fn is_cached(&self) -> bool {
        let slot = self.slot.lock().await;
        slot.as_ref().map(|e| self.is_fresh(e)).unwrap_or(false)
    }

    /// Drop the cached value
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_memo_runs_init_once() {
        let memo: Memo<u32> = Memo::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = memo
                .get_or_init(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    7
                })
                .await;
            assert_eq!(*value, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_memo_single_flight() {
        let memo: Arc<Memo<u32>> = Arc::new(Memo::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let memo = Arc::clone(&memo);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                memo.get_or_init(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    42
                })
                .await
            }));
        }

        for handle in handles {
            assert_eq!(*handle.await.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_memo_does_not_cache_errors() {
        let memo: Memo<u32> = Memo::new();

        let first: Result<Arc<u32>, &str> = memo.get_or_try_init(|| async { Err("boom") }).await;
        assert!(first.is_err());
        assert!(!memo.is_cached().await);

        let second: Result<Arc<u32>, &str> = memo.get_or_try_init(|| async { Ok(3) }).await;
        assert_eq!(*second.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_memo_ttl_expires() {
        let memo: Memo<u32> = Memo::with_ttl(Duration::from_millis(10));
        memo.get_or_init(|| async { 1 }).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!memo.is_cached().await);

        let value = memo.get_or_init(|| async { 2 }).await;
        assert_eq!(*value, 2);
    }
}
