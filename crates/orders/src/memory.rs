use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, UserId};
use tokio::sync::RwLock;

use crate::{NewOrder, Order, OrderError, OrderStatus, Result, repository::OrderRepository};

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: BTreeMap<OrderId, Order>,
    last_id: i64,
    reads: usize,
    fail_on_write: bool,
}

/// In-memory order repository for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail as if the database rejected it.
    pub async fn set_fail_on_write(&self, fail: bool) {
        self.state.write().await.fail_on_write = fail;
    }

    /// Returns how many lookups reached the store.
    pub async fn read_count(&self) -> usize {
        self.state.read().await.reads
    }

    /// Returns the number of stored orders.
    pub async fn len(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns true if no order has been stored.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.orders.is_empty()
    }
}

fn write_rejected() -> OrderError {
    OrderError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let mut state = self.state.write().await;
        if state.fail_on_write {
            return Err(write_rejected());
        }

        state.last_id += 1;
        let stored = order.into_order(OrderId::new(state.last_id), Utc::now());
        state.orders.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let mut state = self.state.write().await;
        state.reads += 1;
        Ok(state.orders.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let mut state = self.state.write().await;
        state.reads += 1;

        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.fail_on_write {
            return Err(write_rejected());
        }

        match state.orders.get_mut(&id) {
            Some(order) => {
                order.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use common::{Money, Product, ProductId};

    use super::*;
    use crate::NewOrderItem;

    fn new_order(user: i64) -> NewOrder {
        let product = Product {
            id: ProductId::new(7),
            name: "Widget".to_string(),
            description: String::new(),
            price: Money::from_cents(1000),
            stock: 5,
        };
        NewOrder::pending(
            UserId::new(user),
            "addr",
            vec![NewOrderItem::snapshot(&product, 1)],
        )
    }

    #[tokio::test]
    async fn user_orders_are_most_recent_first() {
        let repo = InMemoryOrderRepository::new();
        let first = repo.insert(new_order(1)).await.unwrap();
        let second = repo.insert(new_order(1)).await.unwrap();
        repo.insert(new_order(2)).await.unwrap();

        let orders = repo.find_by_user(UserId::new(1)).await.unwrap();
        let ids: Vec<_> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn failing_insert_stores_nothing() {
        let repo = InMemoryOrderRepository::new();
        repo.set_fail_on_write(true).await;

        assert!(repo.insert(new_order(1)).await.is_err());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn update_status_of_missing_order_reports_absence() {
        let repo = InMemoryOrderRepository::new();
        assert!(
            !repo
                .update_status(OrderId::new(1), OrderStatus::Shipped)
                .await
                .unwrap()
        );
    }
}
