//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p cart --test postgres_repository -- --test-threads=1
//! ```

use std::sync::Arc;

use cart::{Cart, CartError, CartRepository, PostgresCartRepository};
use common::{CartId, Money, ProductId, UserId};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_commerce_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Fresh pool with every table emptied.
async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query(
        "TRUNCATE TABLE products, carts, cart_items, orders, order_items RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await
    .unwrap();

    pool
}

#[tokio::test]
async fn test_find_or_create_is_idempotent() {
    let repo = PostgresCartRepository::new(get_test_pool().await);
    let user = UserId::new(42);

    assert!(repo.find_by_user(user).await.unwrap().is_none());

    let first = repo.find_or_create(user).await.unwrap();
    let second = repo.find_or_create(user).await.unwrap();
    assert_eq!(first.id, second.id);
    assert!(second.is_empty());
}

#[tokio::test]
async fn test_cart_save_preserves_item_order() {
    let repo = PostgresCartRepository::new(get_test_pool().await);
    let user = UserId::new(7);

    let mut cart = repo.find_or_create(user).await.unwrap();
    cart.push_item(ProductId::new(3), 1, Money::from_cents(300));
    cart.push_item(ProductId::new(1), 2, Money::from_cents(100));
    cart.push_item(ProductId::new(2), 3, Money::from_cents(200));
    repo.save(&cart).await.unwrap();

    let loaded = repo.find_by_user(user).await.unwrap().unwrap();
    let ids: Vec<i64> = loaded
        .items
        .iter()
        .map(|item| item.product_id.as_i64())
        .collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(loaded.items[2].quantity, 3);
    assert_eq!(loaded.items[2].price.cents(), 200);

    cart.remove_item(ProductId::new(1));
    repo.save(&cart).await.unwrap();

    let loaded = repo.find_by_user(user).await.unwrap().unwrap();
    assert_eq!(loaded.items.len(), 2);

    cart.clear();
    repo.save(&cart).await.unwrap();
    assert!(repo.find_by_user(user).await.unwrap().unwrap().is_empty());
}

#[tokio::test]
async fn test_saving_unknown_cart_fails() {
    let repo = PostgresCartRepository::new(get_test_pool().await);

    let cart = Cart::new(CartId::new(999), UserId::new(1));
    let err = repo.save(&cart).await.unwrap_err();
    assert!(matches!(err, CartError::CartNotFound(_)));
}
