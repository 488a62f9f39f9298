//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{OrderId, UserId};
use orders::{OrderResponse, OrderStatus};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    #[serde(rename = "shippingAddress", alias = "shipping_address")]
    pub shipping_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// POST /orders/from-cart/{user_id}?shippingAddress=...
#[tracing::instrument(skip(state, _caller, query))]
pub async fn create_from_cart(
    State(state): State<Arc<AppState>>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<UserId>,
    Query(query): Query<CheckoutQuery>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let address = query
        .shipping_address
        .filter(|address| !address.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("shippingAddress is required".to_string()))?;

    let order = state
        .orders
        .create_order_from_cart(user_id, &address)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    _caller: AuthenticatedUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderResponse>, ApiError> {
    Ok(Json(state.orders.get_order_by_id(id).await?))
}

/// GET /orders/user/{user_id}: most recent first.
pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    Ok(Json(state.orders.get_orders_by_user_id(user_id).await?))
}

/// PUT /orders/{id}/status?status=SHIPPED
#[tracing::instrument(skip(state, _caller))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    _caller: AuthenticatedUser,
    Path(id): Path<OrderId>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<OrderResponse>, ApiError> {
    let status: OrderStatus = query.status.parse()?;
    Ok(Json(state.orders.update_order_status(id, status).await?))
}
