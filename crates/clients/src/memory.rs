//! In-memory peers for tests and single-process wiring.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use common::{Product, ProductId, UserId};

use crate::{CartClient, CartView, CatalogClient, ClientError, IdentityClient, Result};

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    unavailable: bool,
    lookups: usize,
}

/// In-memory catalog peer for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogClient {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product.
    pub fn put_product(&self, product: Product) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.products.insert(product.id, product);
    }

    /// Removes a product so later lookups report it as not found.
    pub fn remove_product(&self, id: ProductId) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.products.remove(&id);
    }

    /// Makes every subsequent lookup fail as if the catalog were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.unavailable = unavailable;
    }

    /// Returns how many lookups reached this peer.
    pub fn lookup_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookups
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalogClient {
    async fn get_product(&self, id: ProductId) -> Result<Product> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.lookups += 1;

        if state.unavailable {
            return Err(ClientError::unavailable("catalog", "connection refused"));
        }

        state
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| ClientError::not_found("product", id))
    }
}

#[derive(Debug, Default)]
struct InMemoryCartState {
    carts: HashMap<UserId, CartView>,
    unavailable: bool,
}

/// In-memory cart peer for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartClient {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the cart for `cart.user_id`.
    pub fn put_cart(&self, cart: CartView) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.carts.insert(cart.user_id, cart);
    }

    /// Returns a copy of the stored cart, if any.
    pub fn cart(&self, user_id: UserId) -> Option<CartView> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .carts
            .get(&user_id)
            .cloned()
    }

    /// Makes every subsequent read fail as if the cart service were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.unavailable = unavailable;
    }
}

#[async_trait]
impl CartClient for InMemoryCartClient {
    async fn get_cart(&self, user_id: UserId) -> Result<Option<CartView>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.unavailable {
            return Err(ClientError::unavailable("cart", "connection refused"));
        }
        Ok(state.carts.get(&user_id).cloned())
    }
}

#[derive(Debug, Default)]
struct InMemoryIdentityState {
    users: Vec<UserId>,
    unavailable: bool,
}

/// In-memory identity peer for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityClient {
    state: Arc<RwLock<InMemoryIdentityState>>,
}

impl InMemoryIdentityClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user id.
    pub fn register(&self, user_id: UserId) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.users.push(user_id);
    }

    /// Makes every subsequent check fail as if the identity service were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.unavailable = unavailable;
    }
}

#[async_trait]
impl IdentityClient for InMemoryIdentityClient {
    async fn user_exists(&self, user_id: UserId) -> Result<bool> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.unavailable {
            return Err(ClientError::unavailable("identity", "connection refused"));
        }
        Ok(state.users.contains(&user_id))
    }
}
