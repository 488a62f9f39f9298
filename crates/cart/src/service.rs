//! Cart operations: validate-then-apply adds, cache-aside reads.

use std::collections::HashMap;

use async_trait::async_trait;
use cache::{CacheStore, TypedCache, keys, ttl};
use clients::{CartClient, CartView, CatalogClient, ClientError};
use common::{Product, ProductId, UserId};

use crate::{AddItem, Cart, CartError, LineViolation, Result, repository::CartRepository};

/// Cart service over a cart store, a catalog collaborator and a cache store.
pub struct CartService<R, C, S> {
    repository: R,
    catalog: C,
    cache: TypedCache<S>,
}

impl<R, C, S> CartService<R, C, S>
where
    R: CartRepository,
    C: CatalogClient,
    S: CacheStore,
{
    pub fn new(repository: R, catalog: C, cache_store: S) -> Self {
        Self {
            repository,
            catalog,
            cache: TypedCache::new(cache_store),
        }
    }

    /// Adds every requested line to the user's cart, or none of them.
    ///
    /// All lines are validated against the catalog first and every violation
    /// is reported together. Stock is checked, not reserved.
    #[tracing::instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn add_to_cart(&self, user_id: UserId, items: Vec<AddItem>) -> Result<Cart> {
        if items.is_empty() {
            return Err(CartError::InvalidQuantity(
                "cart items cannot be empty".to_string(),
            ));
        }

        let lines = self.validate(user_id, &items).await?;
        let mut cart = self.repository.find_or_create(user_id).await?;

        for (product, quantity) in &lines {
            match cart.item_mut(product.id) {
                Some(existing) => {
                    let requested = existing.quantity.saturating_add(*quantity);
                    // The cart may have grown since it was validated.
                    if !product.has_stock_for(requested) {
                        return Err(CartError::InsufficientStock {
                            product_id: product.id,
                            requested,
                            available: product.stock,
                        });
                    }
                    existing.quantity = requested;
                }
                None => cart.push_item(product.id, *quantity, product.price),
            }
        }

        self.repository.save(&cart).await?;
        tracing::info!(%user_id, items = cart.items.len(), "cart updated");

        self.invalidate(user_id, lines.iter().map(|(product, _)| product.id))
            .await;
        Ok(cart)
    }

    /// Checks every line without writing anything.
    ///
    /// Stock is checked against the running total per product: what the cart
    /// already holds plus every earlier line of this request.
    async fn validate(&self, user_id: UserId, items: &[AddItem]) -> Result<Vec<(Product, u32)>> {
        let existing = self.repository.find_by_user(user_id).await?;
        let mut totals: HashMap<ProductId, u32> = existing
            .iter()
            .flat_map(|cart| &cart.items)
            .map(|item| (item.product_id, item.quantity))
            .collect();

        let mut violations = Vec::new();
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            let quantity = match u32::try_from(item.quantity) {
                Ok(quantity) if quantity > 0 => quantity,
                _ => {
                    violations.push(LineViolation::InvalidQuantity {
                        product_id: item.product_id,
                        quantity: item.quantity,
                    });
                    continue;
                }
            };

            let product = match self.catalog.get_product(item.product_id).await {
                Ok(product) => product,
                Err(error) if error.is_not_found() => {
                    violations.push(LineViolation::ProductNotFound {
                        product_id: item.product_id,
                    });
                    continue;
                }
                Err(error) => return Err(CartError::DependencyUnavailable(error.to_string())),
            };

            let total = totals.entry(product.id).or_default();
            let requested = total.saturating_add(quantity);
            if !product.has_stock_for(requested) {
                violations.push(LineViolation::InsufficientStock {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    requested,
                    available: product.stock,
                });
                continue;
            }

            *total = requested;
            lines.push((product, quantity));
        }

        if !violations.is_empty() {
            tracing::warn!(violations = violations.len(), "cart request rejected");
            return Err(CartError::Validation(violations));
        }
        Ok(lines)
    }

    /// Loads the user's cart. `None` means the user has never added anything.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<Option<Cart>> {
        let key = keys::cart(user_id);
        if let Some(cart) = self.cache.get::<Cart>(&key).await {
            return Ok(Some(cart));
        }

        let cart = self.repository.find_by_user(user_id).await?;
        if let Some(cart) = &cart {
            self.cache.put(&key, cart, ttl::CART).await;
        }
        Ok(cart)
    }

    /// Overwrites the quantity of a line; a quantity of zero or less removes it.
    ///
    /// The stock re-check is best-effort: if the catalog cannot be reached the
    /// update proceeds, since the user already holds the line.
    #[tracing::instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart> {
        let mut cart = self.load(user_id).await?;
        if cart.item(product_id).is_none() {
            return Err(CartError::ItemNotFound {
                user_id,
                product_id,
            });
        }

        if quantity <= 0 {
            cart.remove_item(product_id);
        } else {
            let quantity = u32::try_from(quantity)
                .map_err(|_| CartError::InvalidQuantity(format!("quantity {quantity} is too large")))?;

            match self.catalog.get_product(product_id).await {
                Ok(product) if !product.has_stock_for(quantity) => {
                    return Err(CartError::InsufficientStock {
                        product_id,
                        requested: quantity,
                        available: product.stock,
                    });
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(%product_id, %error, "stock check skipped");
                }
            }

            if let Some(item) = cart.item_mut(product_id) {
                item.quantity = quantity;
            }
        }

        self.repository.save(&cart).await?;
        self.invalidate(user_id, [product_id]).await;
        Ok(cart)
    }

    /// Removes one line. Removing a product that is not in the cart is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn remove_from_cart(&self, user_id: UserId, product_id: ProductId) -> Result<Cart> {
        let mut cart = self.load(user_id).await?;
        cart.remove_item(product_id);

        self.repository.save(&cart).await?;
        self.invalidate(user_id, [product_id]).await;
        Ok(cart)
    }

    /// Removes every line from the user's cart.
    #[tracing::instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: UserId) -> Result<()> {
        let mut cart = self.load(user_id).await?;
        let removed = cart.clear();

        self.repository.save(&cart).await?;
        tracing::info!(%user_id, removed = removed.len(), "cart cleared");

        self.invalidate(user_id, removed.iter().map(|item| item.product_id))
            .await;
        Ok(())
    }

    async fn load(&self, user_id: UserId) -> Result<Cart> {
        self.repository
            .find_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound(user_id))
    }

    async fn invalidate(&self, user_id: UserId, products: impl IntoIterator<Item = ProductId>) {
        let mut stale = vec![keys::cart(user_id)];
        stale.extend(products.into_iter().map(keys::product));
        self.cache.invalidate(&stale).await;
    }
}

#[async_trait]
impl<R, C, S> CartClient for CartService<R, C, S>
where
    R: CartRepository,
    C: CatalogClient,
    S: CacheStore,
{
    /// Reads the live cart from the store, bypassing the cart cache.
    async fn get_cart(&self, user_id: UserId) -> clients::Result<Option<CartView>> {
        self.repository
            .find_by_user(user_id)
            .await
            .map(|cart| cart.map(|cart| cart.to_view()))
            .map_err(|e| ClientError::unavailable("cart", e.to_string()))
    }
}
