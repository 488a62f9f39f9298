use std::fmt;

use common::{ProductId, UserId};
use serde::Serialize;
use thiserror::Error;

/// One rejected line of a multi-item cart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineViolation {
    InvalidQuantity {
        product_id: ProductId,
        quantity: i64,
    },
    ProductNotFound {
        product_id: ProductId,
    },
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        requested: u32,
        available: u32,
    },
}

impl LineViolation {
    pub fn product_id(&self) -> ProductId {
        match self {
            LineViolation::InvalidQuantity { product_id, .. }
            | LineViolation::ProductNotFound { product_id }
            | LineViolation::InsufficientStock { product_id, .. } => *product_id,
        }
    }
}

impl fmt::Display for LineViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineViolation::InvalidQuantity {
                product_id,
                quantity,
            } => write!(f, "Invalid quantity {quantity} for product {product_id}"),
            LineViolation::ProductNotFound { product_id } => {
                write!(f, "Product not found: {product_id}")
            }
            LineViolation::InsufficientStock {
                product_name,
                requested,
                available,
                ..
            } => write!(
                f,
                "Insufficient stock for product {product_name}: requested {requested}, available {available}"
            ),
        }
    }
}

/// Errors that can occur in cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// One or more requested lines failed validation; nothing was applied.
    #[error("Cart validation failed: {}", join_violations(.0))]
    Validation(Vec<LineViolation>),

    /// The request carried an unusable quantity or no lines at all.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Applying the request would exceed the product's stock.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The user has no cart.
    #[error("Cart not found for user {0}")]
    CartNotFound(UserId),

    /// The user's cart holds no line for this product.
    #[error("Item for product {product_id} not found in cart of user {user_id}")]
    ItemNotFound {
        user_id: UserId,
        product_id: ProductId,
    },

    /// The catalog could not be consulted.
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CartError {
    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CartError::Validation(_) => "VALIDATION_FAILED",
            CartError::InvalidQuantity(_) => "INVALID_QUANTITY",
            CartError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            CartError::CartNotFound(_) | CartError::ItemNotFound { .. } => "NOT_FOUND",
            CartError::DependencyUnavailable(_) => "DEPENDENCY_UNAVAILABLE",
            CartError::Database(_) => "INTERNAL",
        }
    }

    /// The individual line violations, if this is an aggregate failure.
    pub fn violations(&self) -> &[LineViolation] {
        match self {
            CartError::Validation(violations) => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[LineViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
