use thiserror::Error;

/// Errors raised at the cache boundary.
///
/// These never escape [`crate::TypedCache`]; they exist so store
/// implementations and the codec can report what went wrong before the
/// failure is logged and turned into a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing store could not be reached.
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),

    /// The Redis client reported an error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A value could not be serialized or was not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A payload was valid JSON but matched neither the typed nor the map shape.
    #[error("Undecodable {record} payload: {reason}")]
    Decode {
        record: &'static str,
        reason: String,
    },
}

impl CacheError {
    pub(crate) fn decode(record: &'static str, reason: impl Into<String>) -> Self {
        CacheError::Decode {
            record,
            reason: reason.into(),
        }
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
