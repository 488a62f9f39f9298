//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use cart::AddItem;
use clients::CartView;
use common::{ProductId, UserId};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuantityQuery {
    pub quantity: i64,
}

/// POST /cart/{user_id}/add: body is a list of `{product_id, quantity}` lines.
#[tracing::instrument(skip(state, _caller, items))]
pub async fn add(
    State(state): State<Arc<AppState>>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<UserId>,
    Json(items): Json<Vec<AddItem>>,
) -> Result<Json<CartView>, ApiError> {
    let cart = state.carts.add_to_cart(user_id, items).await?;
    Ok(Json(cart.to_view()))
}

/// GET /cart/{user_id}: a user without a cart gets an empty item list.
pub async fn get(
    State(state): State<Arc<AppState>>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<CartView>, ApiError> {
    let view = state
        .carts
        .get_cart(user_id)
        .await?
        .map(|cart| cart.to_view())
        .unwrap_or_else(|| CartView::empty(user_id));
    Ok(Json(view))
}

/// PUT /cart/{user_id}/items/{product_id}?quantity=N: zero or less removes the line.
#[tracing::instrument(skip(state, _caller))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    _caller: AuthenticatedUser,
    Path((user_id, product_id)): Path<(UserId, ProductId)>,
    Query(query): Query<QuantityQuery>,
) -> Result<Json<CartView>, ApiError> {
    let cart = state
        .carts
        .update_cart_item(user_id, product_id, query.quantity)
        .await?;
    Ok(Json(cart.to_view()))
}

/// DELETE /cart/{user_id}/items/{product_id}
#[tracing::instrument(skip(state, _caller))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    _caller: AuthenticatedUser,
    Path((user_id, product_id)): Path<(UserId, ProductId)>,
) -> Result<Json<CartView>, ApiError> {
    let cart = state.carts.remove_from_cart(user_id, product_id).await?;
    Ok(Json(cart.to_view()))
}

/// DELETE /cart/{user_id}
#[tracing::instrument(skip(state, _caller))]
pub async fn clear(
    State(state): State<Arc<AppState>>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
    state.carts.clear_cart(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
