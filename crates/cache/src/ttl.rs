//! Time-to-live for each cached entity kind.

use std::time::Duration;

/// Catalog entries: single products and the full product list.
pub const CATALOG: Duration = Duration::from_secs(10 * 60);

/// Cart snapshots.
pub const CART: Duration = Duration::from_secs(30 * 60);

/// Single orders and per-user order lists.
pub const ORDER: Duration = Duration::from_secs(60 * 60);
