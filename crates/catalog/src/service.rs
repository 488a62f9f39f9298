//! Catalog service: cache-aside reads, invalidate-on-write.

use async_trait::async_trait;
use cache::{CacheStore, TypedCache, keys, ttl};
use clients::{CatalogClient, ClientError};
use common::{Product, ProductId};

use crate::{CatalogError, NewProduct, ProductPatch, Result, repository::ProductRepository};

/// Serves catalog reads from the cache and writes through to the store.
pub struct CatalogService<R, S> {
    repository: R,
    cache: TypedCache<S>,
}

impl<R, S> CatalogService<R, S>
where
    R: ProductRepository,
    S: CacheStore,
{
    /// Creates a catalog service over a product store and a cache store.
    pub fn new(repository: R, cache_store: S) -> Self {
        Self {
            repository,
            cache: TypedCache::new(cache_store),
        }
    }

    /// Returns a reference to the product store.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Loads a product, serving it from the cache when possible.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        let key = keys::product(id);
        if let Some(product) = self.cache.get::<Product>(&key).await {
            return Ok(product);
        }

        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        self.cache.put(&key, &product, ttl::CATALOG).await;
        Ok(product)
    }

    /// Loads every product.
    ///
    /// A miss on the collection entry also refreshes every per-product entry,
    /// so point reads that follow are served from the cache.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let all_key = keys::all_products();
        if let Some(products) = self.cache.get::<Vec<Product>>(&all_key).await {
            return Ok(products);
        }

        let products = self.repository.find_all().await?;

        self.cache.put(&all_key, &products, ttl::CATALOG).await;
        for product in &products {
            self.cache
                .put(&keys::product(product.id), product, ttl::CATALOG)
                .await;
        }

        Ok(products)
    }

    /// Stores a new product.
    #[tracing::instrument(skip(self))]
    pub async fn create_product(&self, product: NewProduct) -> Result<Product> {
        product.validate()?;

        let created = self.repository.insert(product).await?;
        tracing::info!(product_id = %created.id, "product created");

        self.invalidate(created.id).await;
        Ok(created)
    }

    /// Applies a partial update to an existing product.
    #[tracing::instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
        let mut product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        patch.apply_to(&mut product)?;

        if !self.repository.update(&product).await? {
            return Err(CatalogError::NotFound(id));
        }
        tracing::info!(product_id = %id, "product updated");

        self.invalidate(id).await;
        Ok(product)
    }

    /// Deletes a product.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        let existed = self.repository.delete(id).await?;

        // A stale entry may outlive the row even when the delete found nothing.
        self.invalidate(id).await;

        if !existed {
            return Err(CatalogError::NotFound(id));
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn invalidate(&self, id: ProductId) {
        self.cache
            .invalidate(&[keys::product(id), keys::all_products()])
            .await;
    }
}

#[async_trait]
impl<R, S> CatalogClient for CatalogService<R, S>
where
    R: ProductRepository,
    S: CacheStore,
{
    async fn get_product(&self, id: ProductId) -> clients::Result<Product> {
        CatalogService::get_product(self, id)
            .await
            .map_err(|e| match e {
                CatalogError::NotFound(id) => ClientError::not_found("product", id),
                other => ClientError::unavailable("catalog", other.to_string()),
            })
    }
}
