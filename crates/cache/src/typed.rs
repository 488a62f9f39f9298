//! Typed, failure-swallowing view over a [`CacheStore`].

use std::time::Duration;

use crate::{CacheRecord, codec, keys, store::CacheStore};

/// Typed cache facade used by the services.
///
/// Every operation is best-effort: store outages, serialization failures and
/// undecodable payloads are logged and reported as a miss (for reads) or
/// ignored (for writes and invalidations). The source of truth is always the
/// relational store, never the cache.
#[derive(Clone)]
pub struct TypedCache<S> {
    store: S,
}

impl<S: CacheStore> TypedCache<S> {
    /// Wraps a raw cache store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads and decodes the record stored under `key`.
    ///
    /// Returns `None` on a miss and on any failure.
    pub async fn get<T: CacheRecord>(&self, key: &str) -> Option<T> {
        let kind = keys::kind_of(key).to_string();

        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                metrics::counter!("cache_misses_total", "kind" => kind).increment(1);
                return None;
            }
            Err(error) => {
                tracing::warn!(key, %error, "cache read failed, treating as miss");
                metrics::counter!("cache_errors_total", "op" => "get").increment(1);
                return None;
            }
        };

        match codec::decode::<T>(&raw) {
            Ok(record) => {
                tracing::debug!(key, "cache hit");
                metrics::counter!("cache_hits_total", "kind" => kind).increment(1);
                Some(record)
            }
            Err(error) => {
                tracing::warn!(key, %error, "cached payload undecodable, treating as miss");
                metrics::counter!("cache_errors_total", "op" => "decode").increment(1);
                None
            }
        }
    }

    /// Stores `record` under `key` for `ttl`. Failures are logged and swallowed.
    pub async fn put<T: CacheRecord>(&self, key: &str, record: &T, ttl: Duration) {
        let raw = match codec::encode(record) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(key, %error, "failed to encode cache entry");
                metrics::counter!("cache_errors_total", "op" => "encode").increment(1);
                return;
            }
        };

        if let Err(error) = self.store.set(key, raw, ttl).await {
            tracing::warn!(key, %error, "failed to populate cache entry");
            metrics::counter!("cache_errors_total", "op" => "set").increment(1);
        }
    }

    /// Deletes every key in `keys`. Failures are logged and swallowed.
    pub async fn invalidate(&self, keys: &[String]) {
        if keys.is_empty() {
            return;
        }

        match self.store.delete(keys).await {
            Ok(()) => tracing::debug!(?keys, "cache entries invalidated"),
            Err(error) => {
                tracing::warn!(?keys, %error, "cache invalidation failed");
                metrics::counter!("cache_errors_total", "op" => "delete").increment(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use common::{Money, Product, ProductId};

    use super::*;
    use crate::InMemoryCacheStore;

    fn widget(stock: u32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Widget".to_string(),
            description: String::new(),
            price: Money::from_cents(500),
            stock,
        }
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let cache = TypedCache::new(InMemoryCacheStore::new());
        cache.put("product:1", &widget(3), Duration::from_secs(60)).await;

        assert_eq!(cache.get::<Product>("product:1").await, Some(widget(3)));
    }

    #[tokio::test]
    async fn absent_entry_is_a_miss() {
        let cache = TypedCache::new(InMemoryCacheStore::new());
        assert!(cache.get::<Product>("product:1").await.is_none());
    }

    #[tokio::test]
    async fn store_outage_is_swallowed() {
        let store = InMemoryCacheStore::new();
        let cache = TypedCache::new(store.clone());
        store.set_unavailable(true).await;

        cache.put("product:1", &widget(3), Duration::from_secs(60)).await;
        cache.invalidate(&["product:1".to_string()]).await;
        assert!(cache.get::<Product>("product:1").await.is_none());
    }

    #[tokio::test]
    async fn garbage_payload_is_a_miss() {
        let store = InMemoryCacheStore::new();
        store
            .insert_raw("product:1", "[1, 2, 3]", Duration::from_secs(60))
            .await;

        let cache = TypedCache::new(store);
        assert!(cache.get::<Product>("product:1").await.is_none());
    }

    #[tokio::test]
    async fn invalidate_removes_entries() {
        let store = InMemoryCacheStore::new();
        let cache = TypedCache::new(store.clone());
        cache.put("product:1", &widget(3), Duration::from_secs(60)).await;

        cache.invalidate(&["product:1".to_string()]).await;
        assert!(!store.contains("product:1").await);
    }
}
