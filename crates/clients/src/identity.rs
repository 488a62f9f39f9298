use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;

use crate::Result;

/// Identity service lookups.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Returns whether a user with this id is registered.
    async fn user_exists(&self, user_id: UserId) -> Result<bool>;
}

#[async_trait]
impl<T: IdentityClient + ?Sized> IdentityClient for Arc<T> {
    async fn user_exists(&self, user_id: UserId) -> Result<bool> {
        (**self).user_exists(user_id).await
    }
}
