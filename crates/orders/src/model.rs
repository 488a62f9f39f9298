//! Order records.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, Product, ProductId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::OrderStatus;

/// A persisted order. Immutable once created except for `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub shipping_address: String,
    pub billing_address: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// A persisted order line.
///
/// `order_id` only records ownership for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
    pub quantity: u32,
    pub subtotal: Money,
}

/// An order that has been built but not stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub shipping_address: String,
    pub billing_address: String,
    pub items: Vec<NewOrderItem>,
}

/// An order line snapshotted from a product at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
    pub quantity: u32,
    pub subtotal: Money,
}

impl NewOrderItem {
    /// Snapshots the product's name and current price.
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            price: product.price,
            quantity,
            subtotal: product.price.times(quantity),
        }
    }
}

impl NewOrder {
    /// Builds a pending order whose total is the sum of its line subtotals.
    ///
    /// The billing address is the shipping address.
    pub fn pending(user_id: UserId, shipping_address: impl Into<String>, items: Vec<NewOrderItem>) -> Self {
        let shipping_address = shipping_address.into();
        Self {
            order_number: generate_order_number(),
            user_id,
            status: OrderStatus::Pending,
            total_amount: items.iter().map(|item| item.subtotal).sum(),
            billing_address: shipping_address.clone(),
            shipping_address,
            items,
        }
    }

    /// Attaches storage-assigned identity to the new order.
    pub fn into_order(self, id: OrderId, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            order_number: self.order_number,
            user_id: self.user_id,
            status: self.status,
            total_amount: self.total_amount,
            shipping_address: self.shipping_address,
            billing_address: self.billing_address,
            created_at,
            items: self
                .items
                .into_iter()
                .map(|item| OrderItem {
                    order_id: id,
                    product_id: item.product_id,
                    product_name: item.product_name,
                    price: item.price,
                    quantity: item.quantity,
                    subtotal: item.subtotal,
                })
                .collect(),
        }
    }
}

/// Generates a human-facing order number such as `ORD-3F2A9C01B7DE`.
pub fn generate_order_number() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", hex[..12].to_ascii_uppercase())
}
