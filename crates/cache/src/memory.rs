use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::{CacheError, Result, store::CacheStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct InMemoryCacheState {
    entries: HashMap<String, Entry>,
    unavailable: bool,
}

/// In-memory cache store for tests and single-process runs.
///
/// Expiry uses `tokio::time`, so tests running with a paused clock can
/// advance past a TTL deterministically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheStore {
    state: Arc<RwLock<InMemoryCacheState>>,
}

impl InMemoryCacheStore {
    /// Creates a new empty in-memory cache store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail as if the store were unreachable.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    /// Returns true if a live (unexpired) entry exists for `key`.
    pub async fn contains(&self, key: &str) -> bool {
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .is_some_and(|entry| entry.expires_at > Instant::now())
    }

    /// Returns the raw payload for `key`, bypassing availability toggles.
    pub async fn raw(&self, key: &str) -> Option<String> {
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    /// Stores a raw payload directly, as another writer would have.
    pub async fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        self.state.write().await.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Returns the number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.state
            .read()
            .await
            .entries
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    /// Returns true if no live entries exist.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn unavailable() -> CacheError {
        CacheError::Unavailable("in-memory cache marked unavailable".to_string())
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut state = self.state.write().await;
        if state.unavailable {
            return Err(Self::unavailable());
        }

        match state.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                state.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut state = self.state.write().await;
        if state.unavailable {
            return Err(Self::unavailable());
        }

        // Keys that are never read again would otherwise outlive their TTL.
        let now = Instant::now();
        state.entries.retain(|_, entry| entry.expires_at > now);
        state.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        let mut state = self.state.write().await;
        if state.unavailable {
            return Err(Self::unavailable());
        }

        for key in keys {
            state.entries.remove(key);
        }
        Ok(())
    }
}
