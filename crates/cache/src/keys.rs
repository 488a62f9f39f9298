//! Cache key space, partitioned by entity-kind prefix.

use common::{OrderId, ProductId, UserId};

pub const PRODUCT_PREFIX: &str = "product:";
pub const CART_PREFIX: &str = "cart:";
pub const ORDER_PREFIX: &str = "order:";
pub const USER_ORDERS_PREFIX: &str = "user-orders:";

/// Key of the full product collection. Distinct from every per-product key.
pub const ALL_PRODUCTS: &str = "products:all";

pub fn product(id: ProductId) -> String {
    format!("{PRODUCT_PREFIX}{id}")
}

pub fn all_products() -> String {
    ALL_PRODUCTS.to_string()
}

pub fn cart(user_id: UserId) -> String {
    format!("{CART_PREFIX}{user_id}")
}

pub fn order(id: OrderId) -> String {
    format!("{ORDER_PREFIX}{id}")
}

pub fn user_orders(user_id: UserId) -> String {
    format!("{USER_ORDERS_PREFIX}{user_id}")
}

/// Returns the entity kind of a key (`"product"`, `"cart"`, ...), used as a metrics label.
pub fn kind_of(key: &str) -> &str {
    key.split(':').next().unwrap_or(key)
}
