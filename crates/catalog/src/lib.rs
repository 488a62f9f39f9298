//! Catalog read model.
//!
//! Products live in a [`ProductRepository`] (the source of truth). The
//! [`CatalogService`] serves reads cache-aside from per-product entries and a
//! separate full-collection entry, and deletes the affected entries after every
//! write instead of rewriting them.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod product;
pub mod repository;
pub mod service;

pub use error::{CatalogError, Result};
pub use memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;
pub use product::{NewProduct, ProductPatch};
pub use repository::ProductRepository;
pub use service::CatalogService;
