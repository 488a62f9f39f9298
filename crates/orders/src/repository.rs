use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId};

use crate::{NewOrder, Order, OrderStatus, Result};

/// Persistent order storage.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores an order together with its items, atomically.
    async fn insert(&self, order: NewOrder) -> Result<Order>;

    /// Loads an order with its items.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// Loads every order of a user, most recent first.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Overwrites an order's status. Returns false if no such order exists.
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<bool>;
}

#[async_trait]
impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        (**self).insert(order).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        (**self).find_by_user(user_id).await
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<bool> {
        (**self).update_status(id, status).await
    }
}
