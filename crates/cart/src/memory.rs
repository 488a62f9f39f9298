use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CartId, UserId};
use tokio::sync::RwLock;

use crate::{Cart, CartError, Result, repository::CartRepository};

#[derive(Debug, Default)]
struct InMemoryCartState {
    carts: HashMap<UserId, Cart>,
    last_id: i64,
    reads: usize,
    fail_on_write: bool,
}

/// In-memory cart repository for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent save fail as if the database rejected it.
    pub async fn set_fail_on_write(&self, fail: bool) {
        self.state.write().await.fail_on_write = fail;
    }

    /// Returns how many lookups reached the store.
    pub async fn read_count(&self) -> usize {
        self.state.read().await.reads
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>> {
        let mut state = self.state.write().await;
        state.reads += 1;
        Ok(state.carts.get(&user_id).cloned())
    }

    async fn find_or_create(&self, user_id: UserId) -> Result<Cart> {
        let mut state = self.state.write().await;
        state.reads += 1;
        if let Some(cart) = state.carts.get(&user_id) {
            return Ok(cart.clone());
        }

        state.last_id += 1;
        let cart = Cart::new(CartId::new(state.last_id), user_id);
        state.carts.insert(user_id, cart.clone());
        tracing::info!(%user_id, cart_id = %cart.id, "cart created");
        Ok(cart)
    }

    async fn save(&self, cart: &Cart) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_on_write {
            return Err(CartError::Database(sqlx::Error::PoolTimedOut));
        }

        match state.carts.get_mut(&cart.user_id) {
            Some(stored) if stored.id == cart.id => {
                stored.items = cart.items.clone();
                Ok(())
            }
            _ => Err(CartError::CartNotFound(cart.user_id)),
        }
    }
}
