use common::ProductId;
use thiserror::Error;

/// Errors that can occur in catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this id exists in the store.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The submitted product data is unusable.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::NotFound(_) => "NOT_FOUND",
            CatalogError::InvalidProduct(_) => "VALIDATION_FAILED",
            CatalogError::Database(_) => "INTERNAL",
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
