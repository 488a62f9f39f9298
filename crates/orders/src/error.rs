use common::{OrderId, ProductId, UserId};
use thiserror::Error;

/// Errors that can occur in order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No order with this id exists.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The identity service reports that the user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// The user's cart is absent or has no items.
    #[error("Cart is empty for user {0}")]
    EmptyCart(UserId),

    /// A cart line references a product the catalog does not know.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A cart line asks for more units than are in stock.
    #[error("Insufficient stock for product {product_name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        requested: u32,
        available: u32,
    },

    /// A peer service could not be reached or answered with an error.
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// The requested status label is not one of the known statuses.
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl OrderError {
    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::NotFound(_) | OrderError::UserNotFound(_) | OrderError::ProductNotFound(_) => {
                "NOT_FOUND"
            }
            OrderError::EmptyCart(_) => "EMPTY_CART",
            OrderError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            OrderError::DependencyUnavailable(_) => "DEPENDENCY_UNAVAILABLE",
            OrderError::InvalidStatus(_) => "VALIDATION_FAILED",
            OrderError::Database(_) => "INTERNAL",
        }
    }
}

impl From<clients::ClientError> for OrderError {
    fn from(error: clients::ClientError) -> Self {
        OrderError::DependencyUnavailable(error.to_string())
    }
}

/// Result type for order operations.
pub type Result<T> = std::result::Result<T, OrderError>;
