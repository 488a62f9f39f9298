//! Flat order projections served to callers and cached.

use cache::{CacheRecord, Fields};
use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Order, OrderItem, OrderStatus};

/// An order with its lines, detached from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub shipping_address: String,
    pub billing_address: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
    pub quantity: u32,
    pub subtotal: Money,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            price: item.price,
            quantity: item.quantity,
            subtotal: item.subtotal,
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number.clone(),
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            shipping_address: order.shipping_address.clone(),
            billing_address: order.billing_address.clone(),
            created_at: order.created_at,
            items: order.items.iter().map(OrderItemResponse::from).collect(),
        }
    }
}

impl CacheRecord for OrderResponse {
    fn from_untyped(value: &Value) -> cache::Result<Self> {
        let fields = Fields::of(value, "order")?;

        let status = fields.string("status")?;
        let status = status
            .parse()
            .map_err(|_| cache::CacheError::Decode {
                record: "order",
                reason: format!("unknown status `{status}`"),
            })?;

        let items = fields
            .list("items")?
            .iter()
            .map(item_from_untyped)
            .collect::<cache::Result<Vec<_>>>()?;

        Ok(OrderResponse {
            id: OrderId::new(fields.i64("id")?),
            order_number: fields.string(fields.pick(&["order_number", "orderNumber"]))?,
            user_id: UserId::new(fields.i64(fields.pick(&["user_id", "userId"]))?),
            status,
            total_amount: fields.money(fields.pick(&["total_amount", "totalAmount"]))?,
            shipping_address: fields
                .string_or_default(fields.pick(&["shipping_address", "shippingAddress"]))?,
            billing_address: fields
                .string_or_default(fields.pick(&["billing_address", "billingAddress"]))?,
            created_at: fields.datetime(fields.pick(&["created_at", "createdAt"]))?,
            items,
        })
    }
}

fn item_from_untyped(value: &Value) -> cache::Result<OrderItemResponse> {
    let fields = Fields::of(value, "order item")?;
    Ok(OrderItemResponse {
        product_id: ProductId::new(fields.i64(fields.pick(&["product_id", "productId"]))?),
        product_name: fields.string_or_default(fields.pick(&["product_name", "productName"]))?,
        price: fields.money("price")?,
        quantity: fields.u32("quantity")?,
        subtotal: fields.money("subtotal")?,
    })
}
