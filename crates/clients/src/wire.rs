//! JSON shapes exchanged between services.

use chrono::{DateTime, Utc};
use common::{Money, Product, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// Product as served by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub stock: u32,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price_cents: product.price.cents(),
            stock: product.stock,
        }
    }
}

impl From<ProductResponse> for Product {
    fn from(response: ProductResponse) -> Self {
        Self {
            id: response.id,
            name: response.name,
            description: response.description,
            price: Money::from_cents(response.price_cents),
            stock: response.stock,
        }
    }
}

/// A user's cart as served by `GET /cart/{userId}`.
///
/// A user without a cart is served as an empty item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<CartItemView>,
}

impl CartView {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One cart line, with the price captured when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_cents: i64,
    pub added_at: DateTime<Utc>,
}
