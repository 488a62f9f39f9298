//! Checkout orchestration and cache-aside order reads.

use std::sync::Arc;
use std::time::Instant;

use cache::{CacheStore, TypedCache, keys, ttl};
use clients::{CartClient, CartView, CatalogClient, IdentityClient};
use common::{OrderId, UserId};

use crate::{
    NewOrder, NewOrderItem, OrderError, OrderResponse, OrderStatus, Result,
    repository::OrderRepository,
};

/// Order service over an order store, a cache store and the cart and
/// catalog collaborators.
pub struct OrderService<R, S, K, P> {
    repository: R,
    cache: TypedCache<S>,
    carts: K,
    catalog: P,
    identity: Option<Arc<dyn IdentityClient>>,
}

impl<R, S, K, P> OrderService<R, S, K, P>
where
    R: OrderRepository,
    S: CacheStore,
    K: CartClient,
    P: CatalogClient,
{
    pub fn new(repository: R, cache_store: S, carts: K, catalog: P) -> Self {
        Self {
            repository,
            cache: TypedCache::new(cache_store),
            carts,
            catalog,
            identity: None,
        }
    }

    /// Consults `identity` before checkout to reject unknown users.
    pub fn with_identity_client(mut self, identity: Arc<dyn IdentityClient>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Converts the user's live cart into a pending order.
    ///
    /// Every line is checked against the catalog before anything is written;
    /// a single failing line aborts the checkout with no order stored. The
    /// cart itself is left untouched.
    #[tracing::instrument(skip(self, shipping_address))]
    pub async fn create_order_from_cart(
        &self,
        user_id: UserId,
        shipping_address: &str,
    ) -> Result<OrderResponse> {
        let started = Instant::now();
        let result = self.checkout(user_id, shipping_address).await;
        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());

        match &result {
            Ok(order) => {
                metrics::counter!("orders_created_total").increment(1);
                tracing::info!(
                    order_id = %order.id,
                    order_number = %order.order_number,
                    total = %order.total_amount,
                    "order created from cart"
                );
            }
            Err(error) => {
                metrics::counter!("checkout_failures_total", "reason" => error.kind())
                    .increment(1);
                tracing::warn!(%error, "checkout aborted");
            }
        }
        result
    }

    async fn checkout(&self, user_id: UserId, shipping_address: &str) -> Result<OrderResponse> {
        self.ensure_user_exists(user_id).await?;

        let cart = self
            .carts
            .get_cart(user_id)
            .await?
            .filter(|cart| !cart.is_empty())
            .ok_or(OrderError::EmptyCart(user_id))?;

        let items = self.snapshot_lines(&cart).await?;
        let order = self
            .repository
            .insert(NewOrder::pending(user_id, shipping_address, items))
            .await?;

        // The order itself is cached on first read, not here.
        self.cache.invalidate(&[keys::user_orders(user_id)]).await;

        Ok(OrderResponse::from(&order))
    }

    async fn ensure_user_exists(&self, user_id: UserId) -> Result<()> {
        let Some(identity) = &self.identity else {
            return Ok(());
        };

        match identity.user_exists(user_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(OrderError::UserNotFound(user_id)),
            Err(error) => {
                tracing::warn!(%user_id, %error, "identity check skipped");
                Ok(())
            }
        }
    }

    async fn snapshot_lines(&self, cart: &CartView) -> Result<Vec<NewOrderItem>> {
        let mut items = Vec::with_capacity(cart.items.len());

        for line in &cart.items {
            let product = self.catalog.get_product(line.product_id).await.map_err(|e| {
                if e.is_not_found() {
                    OrderError::ProductNotFound(line.product_id)
                } else {
                    OrderError::DependencyUnavailable(e.to_string())
                }
            })?;

            if !product.has_stock_for(line.quantity) {
                return Err(OrderError::InsufficientStock {
                    product_id: product.id,
                    product_name: product.name,
                    requested: line.quantity,
                    available: product.stock,
                });
            }

            items.push(NewOrderItem::snapshot(&product, line.quantity));
        }

        Ok(items)
    }

    /// Loads one order.
    #[tracing::instrument(skip(self))]
    pub async fn get_order_by_id(&self, id: OrderId) -> Result<OrderResponse> {
        let key = keys::order(id);
        if let Some(order) = self.cache.get::<OrderResponse>(&key).await {
            return Ok(order);
        }

        let order = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        let response = OrderResponse::from(&order);
        self.cache.put(&key, &response, ttl::ORDER).await;
        Ok(response)
    }

    /// Loads every order of a user, most recent first.
    #[tracing::instrument(skip(self))]
    pub async fn get_orders_by_user_id(&self, user_id: UserId) -> Result<Vec<OrderResponse>> {
        let key = keys::user_orders(user_id);
        if let Some(orders) = self.cache.get::<Vec<OrderResponse>>(&key).await {
            return Ok(orders);
        }

        let responses: Vec<OrderResponse> = self
            .repository
            .find_by_user(user_id)
            .await?
            .iter()
            .map(OrderResponse::from)
            .collect();

        self.cache.put(&key, &responses, ttl::ORDER).await;
        Ok(responses)
    }

    /// Replaces an order's status. Any status may follow any other.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<OrderResponse> {
        let mut order = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        if !self.repository.update_status(id, status).await? {
            return Err(OrderError::NotFound(id));
        }
        let previous = std::mem::replace(&mut order.status, status);

        self.cache
            .invalidate(&[keys::order(id), keys::user_orders(order.user_id)])
            .await;

        tracing::info!(
            order_number = %order.order_number,
            from = %previous,
            to = %status,
            "order status updated"
        );
        Ok(OrderResponse::from(&order))
    }
}
