use std::sync::Arc;

use async_trait::async_trait;
use common::{Product, ProductId};

use crate::{NewProduct, Result};

/// Persistent product storage.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Stores a new product and returns it with its assigned id.
    async fn insert(&self, product: NewProduct) -> Result<Product>;

    /// Loads a product by id.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// Loads every product, ordered by id.
    async fn find_all(&self) -> Result<Vec<Product>>;

    /// Overwrites a stored product. Returns false if no such product exists.
    async fn update(&self, product: &Product) -> Result<bool>;

    /// Deletes a product. Returns false if no such product existed.
    async fn delete(&self, id: ProductId) -> Result<bool>;
}

#[async_trait]
impl<T: ProductRepository + ?Sized> ProductRepository for Arc<T> {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        (**self).insert(product).await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        (**self).find_all().await
    }

    async fn update(&self, product: &Product) -> Result<bool> {
        (**self).update(product).await
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        (**self).delete(id).await
    }
}
