//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p orders --test postgres_repository -- --test-threads=1
//! ```

use std::sync::Arc;

use common::{Money, OrderId, Product, ProductId, UserId};
use orders::{NewOrder, NewOrderItem, OrderRepository, OrderStatus, PostgresOrderRepository};
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

fn widget(price_cents: i64) -> Product {
    Product {
        id: ProductId::new(1),
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        price: Money::from_cents(price_cents),
        stock: 10,
    }
}

#[tokio::test]
async fn test_order_insert_and_read_back() {
    let repo = PostgresOrderRepository::new(get_test_pool().await);
    let product = widget(1000);

    let new_order = NewOrder::pending(
        UserId::new(42),
        "1 Main St",
        vec![NewOrderItem::snapshot(&product, 3)],
    );
    let order_number = new_order.order_number.clone();

    let order = repo.insert(new_order).await.unwrap();
    assert_eq!(order.order_number, order_number);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount.cents(), 3000);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].order_id, order.id);

    let loaded = repo.find_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(loaded.items[0].product_name, "Widget");
    assert_eq!(loaded.items[0].subtotal.cents(), 3000);
    assert_eq!(loaded.billing_address, "1 Main St");
}

#[tokio::test]
async fn test_orders_by_user_most_recent_first() {
    let repo = PostgresOrderRepository::new(get_test_pool().await);
    let product = widget(250);
    let user = UserId::new(5);

    let mut ids = Vec::new();
    for quantity in 1..=3 {
        let order = repo
            .insert(NewOrder::pending(
                user,
                "addr",
                vec![NewOrderItem::snapshot(&product, quantity)],
            ))
            .await
            .unwrap();
        ids.push(order.id);
    }

    let listed = repo.find_by_user(user).await.unwrap();
    let listed_ids: Vec<_> = listed.iter().map(|order| order.id).collect();
    ids.reverse();
    assert_eq!(listed_ids, ids);
    assert!(listed.iter().all(|order| order.items.len() == 1));

    assert!(repo.find_by_user(UserId::new(6)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_status() {
    let repo = PostgresOrderRepository::new(get_test_pool().await);

    let order = repo
        .insert(NewOrder::pending(
            UserId::new(1),
            "addr",
            vec![NewOrderItem::snapshot(&widget(100), 1)],
        ))
        .await
        .unwrap();

    assert!(repo.update_status(order.id, OrderStatus::Delivered).await.unwrap());
    // No transition rules: any status may follow any other.
    assert!(repo.update_status(order.id, OrderStatus::Pending).await.unwrap());

    let loaded = repo.find_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, OrderStatus::Pending);

    assert!(!repo
        .update_status(OrderId::new(9999), OrderStatus::Shipped)
        .await
        .unwrap());
}
