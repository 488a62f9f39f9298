//! Cache-aided catalog lookups for consumers of the catalog.

use async_trait::async_trait;
use cache::{CacheStore, TypedCache, keys, ttl};
use common::{Product, ProductId};

use crate::{CatalogClient, Result};

/// Wraps a [`CatalogClient`] with a read-through product cache.
///
/// Reads the shared `product:{id}` entry first; on a miss asks the catalog
/// and repopulates the entry. Only successful lookups are cached.
#[derive(Clone)]
pub struct CachingCatalogClient<C, S> {
    inner: C,
    cache: TypedCache<S>,
}

impl<C, S> CachingCatalogClient<C, S>
where
    C: CatalogClient,
    S: CacheStore,
{
    pub fn new(inner: C, store: S) -> Self {
        Self {
            inner,
            cache: TypedCache::new(store),
        }
    }
}

#[async_trait]
impl<C, S> CatalogClient for CachingCatalogClient<C, S>
where
    C: CatalogClient,
    S: CacheStore,
{
    async fn get_product(&self, id: ProductId) -> Result<Product> {
        let key = keys::product(id);

        if let Some(product) = self.cache.get::<Product>(&key).await {
            return Ok(product);
        }

        let product = self.inner.get_product(id).await?;
        self.cache.put(&key, &product, ttl::CATALOG).await;
        Ok(product)
    }
}
