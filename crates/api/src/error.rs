//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart::CartError;
use catalog::CatalogError;
use orders::OrderError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// The trusted identity header is missing or unusable.
    Unauthenticated(String),
    /// Catalog error.
    Catalog(CatalogError),
    /// Cart error.
    Cart(CartError),
    /// Order error.
    Order(OrderError),
}

impl ApiError {
    /// Machine-readable kind of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "VALIDATION_FAILED",
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::Catalog(err) => err.kind(),
            ApiError::Cart(err) => err.kind(),
            ApiError::Order(err) => err.kind(),
        }
    }
}

fn status_for(kind: &str) -> StatusCode {
    match kind {
        "NOT_FOUND" => StatusCode::NOT_FOUND,
        "UNAUTHENTICATED" => StatusCode::UNAUTHORIZED,
        "EMPTY_CART" | "INVALID_QUANTITY" | "VALIDATION_FAILED" => StatusCode::BAD_REQUEST,
        "INSUFFICIENT_STOCK" => StatusCode::CONFLICT,
        "DEPENDENCY_UNAVAILABLE" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = status_for(kind);

        let (message, violations) = match &self {
            ApiError::BadRequest(msg) | ApiError::Unauthenticated(msg) => (msg.clone(), None),
            ApiError::Catalog(err) => (err.to_string(), None),
            ApiError::Cart(err) => {
                let violations = err.violations();
                let violations = (!violations.is_empty())
                    .then(|| serde_json::to_value(violations).unwrap_or_default());
                (err.to_string(), violations)
            }
            ApiError::Order(err) => (err.to_string(), None),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, kind, "request failed");
        }

        let mut body = serde_json::json!({ "error": message, "kind": kind });
        if let Some(violations) = violations {
            body["violations"] = violations;
        }
        (status, axum::Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        ApiError::Order(err)
    }
}
