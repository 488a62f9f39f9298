//! HTTP client tests against a throwaway axum peer bound to a local port.

use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use chrono::Utc;
use clients::{
    CartClient, CartItemView, CartView, CatalogClient, ClientError, HttpCartClient,
    HttpCatalogClient, HttpClientConfig, HttpIdentityClient, IdentityClient, ProductResponse,
};
use common::{ProductId, UserId};

async fn product(Path(id): Path<i64>) -> Result<Json<ProductResponse>, StatusCode> {
    match id {
        7 => Ok(Json(ProductResponse {
            id: ProductId::new(7),
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price_cents: 1000,
            stock: 5,
        })),
        99 => Err(StatusCode::INTERNAL_SERVER_ERROR),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn slow_product(Path(_id): Path<i64>) -> StatusCode {
    tokio::time::sleep(Duration::from_secs(2)).await;
    StatusCode::OK
}

async fn cart(Path(user_id): Path<i64>, headers: HeaderMap) -> Result<Json<CartView>, StatusCode> {
    let forwarded = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok());
    if forwarded != Some(user_id) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(Json(CartView {
        user_id: UserId::new(user_id),
        items: vec![CartItemView {
            product_id: ProductId::new(7),
            quantity: 3,
            price_cents: 1000,
            added_at: Utc::now(),
        }],
    }))
}

async fn user_exists(Path(id): Path<i64>) -> Json<bool> {
    Json(id == 42)
}

async fn spawn_peer() -> String {
    let app = Router::new()
        .route("/products/{id}", get(product))
        .route("/slow/products/{id}", get(slow_product))
        .route("/cart/{user_id}", get(cart))
        .route("/auth/{id}/exists", get(user_exists));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(base_url: &str) -> HttpClientConfig {
    HttpClientConfig::new(base_url, Duration::from_millis(500))
}

#[tokio::test]
async fn catalog_client_maps_statuses() {
    let base = spawn_peer().await;
    let client = HttpCatalogClient::new(config(&base)).unwrap();

    let product = client.get_product(ProductId::new(7)).await.unwrap();
    assert_eq!(product.price.cents(), 1000);
    assert_eq!(product.stock, 5);

    let err = client.get_product(ProductId::new(8)).await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.get_product(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, ClientError::Unavailable { service: "catalog", .. }));
}

#[tokio::test]
async fn catalog_client_times_out_as_unavailable() {
    let base = spawn_peer().await;
    let client = HttpCatalogClient::new(HttpClientConfig::new(
        format!("{base}/slow"),
        Duration::from_millis(100),
    ))
    .unwrap();

    let err = client.get_product(ProductId::new(7)).await.unwrap_err();
    assert!(matches!(err, ClientError::Unavailable { .. }));
}

#[tokio::test]
async fn unreachable_peer_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpCatalogClient::new(config(&format!("http://{addr}"))).unwrap();
    let err = client.get_product(ProductId::new(7)).await.unwrap_err();
    assert!(matches!(err, ClientError::Unavailable { .. }));
}

#[tokio::test]
async fn cart_client_forwards_user_header() {
    let base = spawn_peer().await;
    let client = HttpCartClient::new(config(&base)).unwrap();

    let cart = client.get_cart(UserId::new(42)).await.unwrap().unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 3);
}

#[tokio::test]
async fn identity_client_reads_existence_flag() {
    let base = spawn_peer().await;
    let client = HttpIdentityClient::new(config(&base)).unwrap();

    assert!(client.user_exists(UserId::new(42)).await.unwrap());
    assert!(!client.user_exists(UserId::new(1)).await.unwrap());
}
