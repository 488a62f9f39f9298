//! Cart and cart item records.

use cache::{CacheRecord, Fields};
use chrono::{DateTime, Utc};
use clients::{CartItemView, CartView};
use common::{CartId, Money, ProductId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user's cart. At most one exists per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
}

/// One cart line.
///
/// `cart_id` only records ownership for persistence; nothing navigates from an
/// item back to its cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price captured when the line was first added.
    pub price: Money,
    pub added_at: DateTime<Utc>,
}

/// A requested line of an add-to-cart call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl AddItem {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

impl Cart {
    /// Creates an empty cart.
    pub fn new(id: CartId, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn item_mut(&mut self, product_id: ProductId) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }

    /// Appends a new line owned by this cart.
    pub fn push_item(&mut self, product_id: ProductId, quantity: u32, price: Money) {
        self.items.push(CartItem {
            cart_id: self.id,
            product_id,
            quantity,
            price,
            added_at: Utc::now(),
        });
    }

    /// Removes the line for `product_id`, returning it if it existed.
    pub fn remove_item(&mut self, product_id: ProductId) -> Option<CartItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Removes every line, returning the removed lines.
    pub fn clear(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }

    /// Projects the cart into the shape other services read.
    pub fn to_view(&self) -> CartView {
        CartView {
            user_id: self.user_id,
            items: self
                .items
                .iter()
                .map(|item| CartItemView {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price_cents: item.price.cents(),
                    added_at: item.added_at,
                })
                .collect(),
        }
    }
}

impl CacheRecord for Cart {
    fn from_untyped(value: &Value) -> cache::Result<Self> {
        let fields = Fields::of(value, "cart")?;
        let id = CartId::new(fields.i64("id")?);

        let items = fields
            .list("items")?
            .iter()
            .map(|item| cart_item_from_untyped(item, id))
            .collect::<cache::Result<Vec<_>>>()?;

        Ok(Cart {
            id,
            user_id: UserId::new(fields.i64(fields.pick(&["user_id", "userId"]))?),
            items,
        })
    }
}

fn cart_item_from_untyped(value: &Value, cart_id: CartId) -> cache::Result<CartItem> {
    let fields = Fields::of(value, "cart item")?;
    Ok(CartItem {
        cart_id,
        product_id: ProductId::new(fields.i64(fields.pick(&["product_id", "productId"]))?),
        quantity: fields.u32("quantity")?,
        price: fields.money("price")?,
        added_at: fields.datetime(fields.pick(&["added_at", "addedAt"]))?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn cart() -> Cart {
        let mut cart = Cart::new(CartId::new(1), UserId::new(42));
        cart.push_item(ProductId::new(7), 3, Money::from_cents(1000));
        cart.push_item(ProductId::new(8), 1, Money::from_cents(250));
        cart
    }

    #[test]
    fn pushed_items_reference_their_cart() {
        let cart = cart();
        assert!(cart.items.iter().all(|item| item.cart_id == cart.id));
    }

    #[test]
    fn remove_item_keeps_order_of_the_rest() {
        let mut cart = cart();
        cart.push_item(ProductId::new(9), 2, Money::from_cents(100));

        let removed = cart.remove_item(ProductId::new(8)).unwrap();
        assert_eq!(removed.quantity, 1);

        let ids: Vec<_> = cart.items.iter().map(|i| i.product_id.as_i64()).collect();
        assert_eq!(ids, vec![7, 9]);
        assert!(cart.remove_item(ProductId::new(8)).is_none());
    }

    #[test]
    fn view_carries_snapshotted_prices() {
        let view = cart().to_view();
        assert_eq!(view.user_id, UserId::new(42));
        assert_eq!(view.items[0].price_cents, 1000);
        assert_eq!(view.items[1].quantity, 1);
    }

    #[test]
    fn typed_cart_round_trips_through_cache_codec() {
        let cart = cart();
        let raw = cache::encode(&cart).unwrap();
        assert_eq!(cache::decode::<Cart>(&raw).unwrap(), cart);
    }

    #[test]
    fn legacy_cart_payload_decodes_from_map() {
        let raw = json!({
            "@class": "com.shop.cartservice.models.Cart",
            "id": 5,
            "userId": "42",
            "items": ["java.util.ArrayList", [{
                "@class": "com.shop.cartservice.models.CartItem",
                "id": 11,
                "productId": 7,
                "quantity": 3,
                "price": 10.0,
                "addedAt": [2024, 5, 1, 12, 30, 0]
            }]]
        })
        .to_string();

        let cart = cache::decode::<Cart>(&raw).unwrap();
        assert_eq!(cart.user_id, UserId::new(42));
        assert_eq!(cart.items.len(), 1);

        let item = &cart.items[0];
        assert_eq!(item.cart_id, CartId::new(5));
        assert_eq!(item.price.cents(), 1000);
        assert_eq!(
            item.added_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
        );
    }
}
