//! Time-boxed read cache for listing endpoints.
//!
//! Fronts low-write-rate sources (the contractor/project listing) with a
//! fixed TTL and an explicit invalidate operation. The staleness bound is
//! exactly the TTL. Never used for transactional entities - availability and
//! verification summaries are always recomputed from row state.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, trace};

struct Entry<V> {
    value: V,
    refreshed_at: Instant,
}

/// A keyed cache with `get_or_refresh` semantics and a fixed TTL.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache whose entries are served for at most `ttl` after the
    /// refresh that produced them.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, or runs `refresh` and caches its
    /// result when the entry is missing or older than the TTL.
    ///
    /// A failed refresh leaves any expired entry in place, so the next call
    /// retries.
    pub async fn get_or_refresh<F, Fut, E>(&self, key: K, refresh: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if entry.refreshed_at.elapsed() < self.ttl {
                    trace!("cache hit");
                    return Ok(entry.value.clone());
                }
            }
        }

        debug!("cache miss, refreshing");
        let value = refresh().await?;
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            Entry {
                value: value.clone(),
                refreshed_at: Instant::now(),
            },
        );
        Ok(value)
    }

    /// Drops one entry so the next read refreshes immediately.
    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn counted_fetch(counter: &AtomicUsize) -> Result<usize, Infallible> {
        Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[tokio::test]
    async fn serves_cached_value_within_ttl() {
        let cache: TtlCache<&str, usize> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_refresh("projects", || counted_fetch(&calls))
            .await
            .unwrap();
        let second = cache
            .get_or_refresh("projects", || counted_fetch(&calls))
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refreshes_after_ttl_expiry() {
        let cache: TtlCache<&str, usize> = TtlCache::new(Duration::from_millis(10));
        let calls = AtomicUsize::new(0);

        cache
            .get_or_refresh("projects", || counted_fetch(&calls))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let refreshed = cache
            .get_or_refresh("projects", || counted_fetch(&calls))
            .await
            .unwrap();

        assert_eq!(refreshed, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let cache: TtlCache<&str, usize> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        cache
            .get_or_refresh("projects", || counted_fetch(&calls))
            .await
            .unwrap();
        cache.invalidate(&"projects").await;
        let refreshed = cache
            .get_or_refresh("projects", || counted_fetch(&calls))
            .await
            .unwrap();

        assert_eq!(refreshed, 2);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache: TtlCache<&str, usize> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        cache
            .get_or_refresh("a", || counted_fetch(&calls))
            .await
            .unwrap();
        cache
            .get_or_refresh("b", || counted_fetch(&calls))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        cache.clear().await;
        cache
            .get_or_refresh("a", || counted_fetch(&calls))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
