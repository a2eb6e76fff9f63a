//! Keyed query cache
//!
//! Same key, same cached result. Entries go stale after `stale_after` and
//! are refetched on the next read; loader errors are never cached.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use shared::models::StoreId;
use tokio::time::{Duration, Instant};

/// Cached results stay fresh for 30 minutes
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    States,
    Cities(i64),
    Categories,
    Services(i64),
    SuggestedServices(i64),
    SocialPlatforms,
    StoresByOwner,
    MainInfo(StoreId),
    Address(StoreId),
    FeedbackUpi(StoreId),
    CategoryBio(StoreId),
    StoreServices(StoreId),
    StoreLinks(StoreId),
    StorePhotos(StoreId),
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

pub struct QueryCache {
    entries: DashMap<QueryKey, Entry>,
    stale_after: Duration,
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            stale_after,
        }
    }

    /// Fresh cached value, if any
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &QueryKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        if entry.fetched_at.elapsed() >= self.stale_after {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Cached value for `key`, or run `loader` and cache its success
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: QueryKey, loader: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(&key) {
            tracing::trace!(?key, "Query cache hit");
            return Ok(value);
        }
        tracing::debug!(?key, "Query cache miss");
        let value = loader().await?;
        self.set(key, value.clone());
        Ok(value)
    }

    pub fn set<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        self.entries.insert(
            key,
            Entry {
                value: Arc::new(value),
                fetched_at: Instant::now(),
            },
        );
    }

    /// Edit a cached value in place; no-op when absent
    pub fn update<T, F>(&self, key: &QueryKey, f: F) -> bool
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(&mut T),
    {
        let Some(mut entry) = self.entries.get_mut(key) else {
            return false;
        };
        let Some(current) = entry.value.downcast_ref::<T>() else {
            return false;
        };
        let mut next = current.clone();
        f(&mut next);
        entry.value = Arc::new(next);
        true
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load(calls: &AtomicUsize, value: Vec<i64>) -> Result<Vec<i64>, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    #[tokio::test]
    async fn test_same_key_same_result() {
        let cache = QueryCache::default();
        let calls = AtomicUsize::new(0);

        let a = cache
            .get_or_fetch(QueryKey::Cities(21), || load(&calls, vec![1, 2]))
            .await
            .unwrap();
        let b = cache
            .get_or_fetch(QueryKey::Cities(21), || load(&calls, vec![9]))
            .await
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A different parent id is a different query
        let c = cache
            .get_or_fetch(QueryKey::Cities(22), || load(&calls, vec![3]))
            .await
            .unwrap();
        assert_eq!(c, vec![3]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let cache = QueryCache::default();
        let failed: Result<Vec<i64>, String> = cache
            .get_or_fetch(QueryKey::States, || async { Err("offline".to_string()) })
            .await;
        assert!(failed.is_err());
        assert!(cache.get::<Vec<i64>>(&QueryKey::States).is_none());
    }

    #[tokio::test]
    async fn test_optimistic_update_and_invalidate() {
        let cache = QueryCache::default();
        cache.set(QueryKey::Categories, vec![1_i64, 2]);
        assert!(cache.update::<Vec<i64>, _>(&QueryKey::Categories, |v| v.push(3)));
        assert_eq!(cache.get::<Vec<i64>>(&QueryKey::Categories), Some(vec![1, 2, 3]));
        assert!(!cache.update::<Vec<i64>, _>(&QueryKey::SocialPlatforms, |v| v.clear()));

        cache.invalidate(&QueryKey::Categories);
        assert!(cache.get::<Vec<i64>>(&QueryKey::Categories).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entries_refetch() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        cache
            .get_or_fetch(QueryKey::States, || load(&calls, vec![1]))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        cache
            .get_or_fetch(QueryKey::States, || load(&calls, vec![1]))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
