//! Cache adapter for the commerce services.
//!
//! - [`CacheStore`] is the raw key/value boundary with per-key TTL
//!   ([`InMemoryCacheStore`], [`RedisCacheStore`]).
//! - [`TypedCache`] layers typed get/put/invalidate on top and swallows every
//!   store or decode failure, so callers only ever observe a hit or a miss.
//! - [`CacheRecord`] decodes payloads defensively: a typed decode first, then a
//!   field-by-field read of whatever map-shaped value another writer left behind.

pub mod codec;
pub mod error;
pub mod keys;
pub mod memory;
pub mod records;
pub mod redis_store;
pub mod store;
pub mod ttl;
pub mod typed;

pub use codec::{CacheRecord, Fields, decode, encode};
pub use error::{CacheError, Result};
pub use memory::InMemoryCacheStore;
pub use redis_store::RedisCacheStore;
pub use store::CacheStore;
pub use typed::TypedCache;
