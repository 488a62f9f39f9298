//! Catalog endpoints. Reads are public; writes need an authenticated caller.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog::{NewProduct, ProductPatch};
use clients::ProductResponse;
use common::{Money, ProductId};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub stock: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<u32>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        ProductPatch {
            name: req.name,
            description: req.description,
            price: req.price_cents.map(Money::from_cents),
            stock: req.stock,
        }
    }
}

/// GET /products
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.catalog.list_products().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// GET /products/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.catalog.get_product(id).await?;
    Ok(Json(product.into()))
}

/// POST /products
#[tracing::instrument(skip(state, user, req), fields(user_id = %user.user_id, username = ?user.username))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state
        .catalog
        .create_product(NewProduct::new(
            req.name,
            req.description,
            Money::from_cents(req.price_cents),
            req.stock,
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /products/{id}: partial update, absent or empty fields are kept.
#[tracing::instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<ProductId>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.catalog.update_product(id, req.into()).await?;
    Ok(Json(product.into()))
}

/// DELETE /products/{id}
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
