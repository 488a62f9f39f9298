//! The catalog product record shared by every service that reads products.

use serde::{Deserialize, Serialize};

use crate::{Money, ProductId};

/// A catalog product as owned by the catalog and snapshotted by carts and orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: u32,
}

impl Product {
    /// Returns true if at least `quantity` units are in stock.
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_stock_for_is_inclusive() {
        let product = Product {
            id: ProductId::new(7),
            name: "Widget".to_string(),
            description: String::new(),
            price: Money::from_cents(1000),
            stock: 5,
        };
        assert!(product.has_stock_for(5));
        assert!(!product.has_stock_for(6));
    }
}
