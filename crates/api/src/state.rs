//! Shared application state and its wiring.

use std::sync::Arc;

use cache::{CacheError, CacheStore, InMemoryCacheStore, RedisCacheStore};
use cart::{CartRepository, CartService, InMemoryCartRepository, PostgresCartRepository};
use catalog::{
    CatalogService, InMemoryProductRepository, PostgresProductRepository, ProductRepository,
};
use clients::{
    CachingCatalogClient, CartClient, CatalogClient, ClientError, HttpCartClient,
    HttpCatalogClient, HttpClientConfig, HttpIdentityClient, IdentityClient,
};
use orders::{InMemoryOrderRepository, OrderRepository, OrderService, PostgresOrderRepository};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::Config;

pub type SharedCache = Arc<dyn CacheStore>;
pub type Catalog = CatalogService<Arc<dyn ProductRepository>, SharedCache>;
pub type Carts = CartService<Arc<dyn CartRepository>, Arc<dyn CatalogClient>, SharedCache>;
pub type Orders =
    OrderService<Arc<dyn OrderRepository>, SharedCache, Arc<dyn CartClient>, Arc<dyn CatalogClient>>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub carts: Arc<Carts>,
    pub orders: Orders,
}

/// The stores backing each service.
pub struct Stores {
    pub products: Arc<dyn ProductRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub cache: SharedCache,
}

impl Stores {
    /// Everything in process memory.
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(InMemoryProductRepository::new()),
            carts: Arc::new(InMemoryCartRepository::new()),
            orders: Arc::new(InMemoryOrderRepository::new()),
            cache: Arc::new(InMemoryCacheStore::new()),
        }
    }

    /// Postgres repositories over one pool.
    pub fn postgres(pool: PgPool, cache: SharedCache) -> Self {
        Self {
            products: Arc::new(PostgresProductRepository::new(pool.clone())),
            carts: Arc::new(PostgresCartRepository::new(pool.clone())),
            orders: Arc::new(PostgresOrderRepository::new(pool)),
            cache,
        }
    }
}

/// Remote collaborators. A `None` peer is served by the in-process service.
#[derive(Default)]
pub struct Peers {
    pub catalog: Option<Arc<dyn CatalogClient>>,
    pub carts: Option<Arc<dyn CartClient>>,
    pub identity: Option<Arc<dyn IdentityClient>>,
}

impl AppState {
    /// Wires the services over `stores`, routing collaborator calls to `peers`
    /// where given.
    pub fn new(stores: Stores, peers: Peers) -> Self {
        let catalog = Arc::new(CatalogService::new(stores.products, stores.cache.clone()));
        let catalog_client: Arc<dyn CatalogClient> = match peers.catalog {
            Some(remote) => remote,
            None => catalog.clone(),
        };

        let carts = Arc::new(CartService::new(
            stores.carts,
            catalog_client.clone(),
            stores.cache.clone(),
        ));
        let cart_client: Arc<dyn CartClient> = match peers.carts {
            Some(remote) => remote,
            None => carts.clone(),
        };

        let mut orders = OrderService::new(stores.orders, stores.cache, cart_client, catalog_client);
        if let Some(identity) = peers.identity {
            orders = orders.with_identity_client(identity);
        }

        Self {
            catalog,
            carts,
            orders,
        }
    }

    /// Fully in-process state with empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(Stores::in_memory(), Peers::default())
    }

    /// Builds state from configuration, connecting to whatever is configured.
    pub async fn from_config(config: &Config) -> Result<Self, StartupError> {
        let cache: SharedCache = match &config.redis_url {
            Some(url) => {
                tracing::info!("using redis cache store");
                Arc::new(RedisCacheStore::connect(url).await?)
            }
            None => Arc::new(InMemoryCacheStore::new()),
        };

        let stores = match &config.database_url {
            Some(url) => {
                let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
                sqlx::raw_sql(include_str!(
                    "../../../migrations/001_create_commerce_tables.sql"
                ))
                .execute(&pool)
                .await?;
                tracing::info!("using postgres repositories");
                Stores::postgres(pool, cache.clone())
            }
            None => {
                tracing::warn!("DATABASE_URL not set, data will not survive a restart");
                Stores {
                    cache: cache.clone(),
                    ..Stores::in_memory()
                }
            }
        };

        let peer = |url: &str| HttpClientConfig::new(url, config.client_timeout);
        let mut peers = Peers::default();
        if let Some(url) = &config.catalog_url {
            let remote = HttpCatalogClient::new(peer(url))?;
            peers.catalog = Some(Arc::new(CachingCatalogClient::new(remote, cache.clone())));
        }
        if let Some(url) = &config.cart_url {
            peers.carts = Some(Arc::new(HttpCartClient::new(peer(url))?));
        }
        if let Some(url) = &config.identity_url {
            peers.identity = Some(Arc::new(HttpIdentityClient::new(peer(url))?));
        }

        Ok(Self::new(stores, peers))
    }
}

/// Failures while bringing the server up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cache store: {0}")]
    Cache(#[from] CacheError),

    #[error("peer client: {0}")]
    Client(#[from] ClientError),

    #[error("metrics recorder: {0}")]
    Metrics(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
