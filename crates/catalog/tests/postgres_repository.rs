//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p catalog --test postgres_repository -- --test-threads=1
//! ```

use std::sync::Arc;

use catalog::{NewProduct, PostgresProductRepository, ProductRepository};
use common::{Money, Product, ProductId};
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

fn widget(price_cents: i64, stock: u32) -> NewProduct {
    NewProduct::new("Widget", "A widget", Money::from_cents(price_cents), stock)
}

#[tokio::test]
async fn test_product_crud() {
    let repo = PostgresProductRepository::new(get_test_pool().await);

    let created = repo.insert(widget(1000, 5)).await.unwrap();
    assert_eq!(created.price.cents(), 1000);

    let mut product = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(product, created);

    product.stock = 2;
    product.price = Money::from_cents(1500);
    assert!(repo.update(&product).await.unwrap());

    let reloaded = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(reloaded.stock, 2);
    assert_eq!(reloaded.price.cents(), 1500);

    assert_eq!(repo.find_all().await.unwrap().len(), 1);

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_of_missing_product_reports_false() {
    let repo = PostgresProductRepository::new(get_test_pool().await);

    let ghost = Product {
        id: ProductId::new(404),
        name: "Ghost".to_string(),
        description: String::new(),
        price: Money::from_cents(1),
        stock: 1,
    };
    assert!(!repo.update(&ghost).await.unwrap());
}
