//! HTTP API server for the catalog, cart and order services.
//!
//! Provides the REST surface over the three services, trusting the caller
//! identity forwarded by the edge gateway, with structured logging (tracing)
//! and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, Peers, StartupError, Stores};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route(
            "/products",
            get(routes::products::list).post(routes::products::create),
        )
        .route(
            "/products/{id}",
            get(routes::products::get)
                .put(routes::products::update)
                .delete(routes::products::delete),
        )
        .route("/cart/{user_id}", get(routes::cart::get).delete(routes::cart::clear))
        .route("/cart/{user_id}/add", post(routes::cart::add))
        .route(
            "/cart/{user_id}/items/{product_id}",
            put(routes::cart::update_item).delete(routes::cart::remove_item),
        )
        .route(
            "/orders/from-cart/{user_id}",
            post(routes::orders::create_from_cart),
        )
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/status", put(routes::orders::update_status))
        .route("/orders/user/{user_id}", get(routes::orders::list_for_user))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
