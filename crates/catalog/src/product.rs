//! Product write models.

use common::{Money, Product};
use serde::{Deserialize, Serialize};

use crate::{CatalogError, Result};

/// Data for a product that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Money, stock: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            stock,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::InvalidProduct(
                "name must not be empty".to_string(),
            ));
        }
        if self.price.is_negative() {
            return Err(CatalogError::InvalidProduct(format!(
                "price must not be negative, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

/// Partial update of a product.
///
/// Only fields that are present are applied; empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<u32>,
}

impl ProductPatch {
    /// Applies the present fields to `product`.
    pub fn apply_to(&self, product: &mut Product) -> Result<()> {
        if let Some(price) = self.price
            && price.is_negative()
        {
            return Err(CatalogError::InvalidProduct(format!(
                "price must not be negative, got {price}"
            )));
        }

        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            product.name = name.clone();
        }
        if let Some(description) = self.description.as_ref().filter(|d| !d.is_empty()) {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        Ok(())
    }
}
