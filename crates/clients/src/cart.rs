use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;

use crate::{CartView, Result};

/// Read access to users' live carts.
#[async_trait]
pub trait CartClient: Send + Sync {
    /// Fetches the user's current cart. `None` means the user has no cart yet.
    async fn get_cart(&self, user_id: UserId) -> Result<Option<CartView>>;
}

#[async_trait]
impl<T: CartClient + ?Sized> CartClient for Arc<T> {
    async fn get_cart(&self, user_id: UserId) -> Result<Option<CartView>> {
        (**self).get_cart(user_id).await
    }
}
