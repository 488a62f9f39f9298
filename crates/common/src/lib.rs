//! Shared identifiers and value objects used by every commerce service.

pub mod headers;
pub mod money;
pub mod product;
pub mod types;

pub use money::Money;
pub use product::Product;
pub use types::{CartId, OrderId, ProductId, UserId};
