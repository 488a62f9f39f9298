//! Cache decoding for records shared across services.

use common::{Product, ProductId};
use serde_json::Value;

use crate::{CacheRecord, Fields, Result};

impl CacheRecord for Product {
    fn from_untyped(value: &Value) -> Result<Self> {
        let fields = Fields::of(value, "product")?;
        Ok(Product {
            id: ProductId::new(fields.i64("id")?),
            name: fields.string("name")?,
            description: fields.string_or_default("description")?,
            price: fields.money("price")?,
            stock: fields.u32("stock")?,
        })
    }
}
