//! Remote service clients.
//!
//! Each peer service is reached through a small async trait so the order
//! orchestrator and the cart can be wired either to in-process services or
//! to HTTP peers:
//! - [`CatalogClient`]: product lookups, optionally cache-aided by [`CachingCatalogClient`]
//! - [`CartClient`]: live cart reads
//! - [`IdentityClient`]: user existence checks
//!
//! Unreachable peers and non-success responses surface as
//! [`ClientError::Unavailable`]; a definite absence surfaces as
//! [`ClientError::NotFound`].

pub mod caching;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod http;
pub mod identity;
pub mod memory;
pub mod wire;

pub use caching::CachingCatalogClient;
pub use cart::CartClient;
pub use catalog::CatalogClient;
pub use error::{ClientError, Result};
pub use http::{HttpCartClient, HttpCatalogClient, HttpClientConfig, HttpIdentityClient};
pub use identity::IdentityClient;
pub use memory::{InMemoryCartClient, InMemoryCatalogClient, InMemoryIdentityClient};
pub use wire::{CartItemView, CartView, ProductResponse};
