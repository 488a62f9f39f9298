use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{Product, ProductId};
use tokio::sync::RwLock;

use crate::{NewProduct, Result, repository::ProductRepository};

#[derive(Debug, Default)]
struct InMemoryProductState {
    products: BTreeMap<ProductId, Product>,
    last_id: i64,
    reads: usize,
}

/// In-memory product repository for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    state: Arc<RwLock<InMemoryProductState>>,
}

impl InMemoryProductRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many reads (single or collection) reached the store.
    pub async fn read_count(&self) -> usize {
        self.state.read().await.reads
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        let stored = Product {
            id: ProductId::new(state.last_id),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
        };
        state.products.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let mut state = self.state.write().await;
        state.reads += 1;
        Ok(state.products.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let mut state = self.state.write().await;
        state.reads += 1;
        Ok(state.products.values().cloned().collect())
    }

    async fn update(&self, product: &Product) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.products.get_mut(&product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        Ok(self.state.write().await.products.remove(&id).is_some())
    }
}
