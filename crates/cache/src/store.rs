use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// Raw key/value store holding serialized payloads with a per-key TTL.
///
/// A missing or expired key is reported as `Ok(None)`, never as an error.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the raw payload stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Deletes every key in `keys`. Absent keys are ignored.
    async fn delete(&self, keys: &[String]) -> Result<()>;
}

#[async_trait]
impl<T: CacheStore + ?Sized> CacheStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl).await
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        (**self).delete(keys).await
    }
}
