//! Cart aggregate.
//!
//! A [`Cart`] is created lazily on a user's first add and owns an ordered list
//! of [`CartItem`]s. [`CartService`] validates every requested line against
//! the catalog before applying any of them, persists through a
//! [`CartRepository`] and deletes the affected cache entries afterwards.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CartError, LineViolation, Result};
pub use memory::InMemoryCartRepository;
pub use model::{AddItem, Cart, CartItem};
pub use postgres::PostgresCartRepository;
pub use repository::CartRepository;
pub use service::CartService;
