//! Caching layer for category quote lists to reduce provider calls

use crate::model::Stock;
use cached::{Cached, TimedCache};
use std::time::Duration;
use tokio::sync::RwLock;

/// TTL cache of category key → normalized stocks
pub struct QuoteCache {
    cache: RwLock<TimedCache<String, Vec<Stock>>>,
}

impl QuoteCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: RwLock::new(TimedCache::with_lifespan(ttl)),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &str) -> Option<Vec<Stock>> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: impl Into<String>, stocks: Vec<Stock>) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key.into(), stocks);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// Only successful fetches are cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetcher: F) -> Result<Vec<Stock>, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Vec<Stock>, E>>,
    {
        if let Some(stocks) = self.get(key).await {
            tracing::debug!(category = key, "Quote cache hit");
            return Ok(stocks);
        }

        tracing::debug!(category = key, "Quote cache miss");

        let stocks = fetcher().await?;
        self.insert(key, stocks.clone()).await;

        Ok(stocks)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &str) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Stock> {
        vec![Stock::new("AAPL", "Apple Inc.", 175.5, 1.2, 0.69)]
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        cache.insert("tech", sample()).await;

        assert_eq!(cache.get("tech").await, Some(sample()));
        assert_eq!(cache.get("finance").await, None);
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = QuoteCache::new(Duration::from_secs(60));

        let mut call_count = 0;
        let result = cache
            .get_or_fetch("tech", || {
                call_count += 1;
                async { Ok::<_, String>(sample()) }
            })
            .await
            .unwrap();
        assert_eq!(result, sample());
        assert_eq!(call_count, 1);

        // Second call should use cache
        let result = cache
            .get_or_fetch("tech", || {
                call_count += 1;
                async { Ok::<_, String>(Vec::new()) }
            })
            .await
            .unwrap();
        assert_eq!(result, sample());
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_not_cached() {
        let cache = QuoteCache::new(Duration::from_secs(60));

        let result = cache
            .get_or_fetch("tech", || async { Err::<Vec<Stock>, _>("boom") })
            .await;
        assert_eq!(result, Err("boom"));
        assert!(cache.get("tech").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_invalidation() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        cache.insert("tech", sample()).await;
        cache.insert("auto", sample()).await;

        cache.invalidate("tech").await;
        assert!(cache.get("tech").await.is_none());
        assert_eq!(cache.get("auto").await, Some(sample()));
    }
}
