use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;

use crate::{Cart, Result};

/// Persistent cart storage.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Loads the user's cart with its items in insertion order.
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>>;

    /// Loads the user's cart, creating an empty one if none exists.
    async fn find_or_create(&self, user_id: UserId) -> Result<Cart>;

    /// Replaces the stored item set of an existing cart with `cart.items`.
    async fn save(&self, cart: &Cart) -> Result<()>;
}

#[async_trait]
impl<T: CartRepository + ?Sized> CartRepository for Arc<T> {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>> {
        (**self).find_by_user(user_id).await
    }

    async fn find_or_create(&self, user_id: UserId) -> Result<Cart> {
        (**self).find_or_create(user_id).await
    }

    async fn save(&self, cart: &Cart) -> Result<()> {
        (**self).save(cart).await
    }
}
