use std::sync::Arc;

use async_trait::async_trait;
use common::{Product, ProductId};

use crate::Result;

/// Read access to the catalog's source of truth.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches a product, failing with [`crate::ClientError::NotFound`] if it does not exist.
    async fn get_product(&self, id: ProductId) -> Result<Product>;
}

#[async_trait]
impl<T: CatalogClient + ?Sized> CatalogClient for Arc<T> {
    async fn get_product(&self, id: ProductId) -> Result<Product> {
        (**self).get_product(id).await
    }
}
