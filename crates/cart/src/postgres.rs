use async_trait::async_trait;
use common::{CartId, Money, ProductId, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{Cart, CartError, CartItem, Result, repository::CartRepository};

/// PostgreSQL-backed cart repository.
#[derive(Debug, Clone)]
pub struct PostgresCartRepository {
    pool: PgPool,
}

impl PostgresCartRepository {
    /// Creates a new repository over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_item(row: PgRow) -> Result<CartItem> {
        let quantity: i32 = row.try_get("quantity")?;
        Ok(CartItem {
            cart_id: CartId::new(row.try_get("cart_id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            price: Money::from_cents(row.try_get("price_cents")?),
            added_at: row.try_get("added_at")?,
        })
    }

    async fn load_items(&self, cart_id: CartId) -> Result<Vec<CartItem>> {
        let rows = sqlx::query(
            r#"
            SELECT cart_id, product_id, quantity, price_cents, added_at
            FROM cart_items
            WHERE cart_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(cart_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>> {
        let row = sqlx::query("SELECT id FROM carts WHERE user_id = $1")
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id = CartId::new(row.try_get("id")?);
        Ok(Some(Cart {
            id,
            user_id,
            items: self.load_items(id).await?,
        }))
    }

    async fn find_or_create(&self, user_id: UserId) -> Result<Cart> {
        // Concurrent first adds race on the unique user_id; the loser reads the winner's row.
        sqlx::query("INSERT INTO carts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;

        self.find_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound(user_id))
    }

    async fn save(&self, cart: &Cart) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE carts SET updated_at = NOW() WHERE id = $1 AND user_id = $2")
            .bind(cart.id.as_i64())
            .bind(cart.user_id.as_i64())
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(CartError::CartNotFound(cart.user_id));
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id.as_i64())
            .execute(&mut *tx)
            .await?;

        for (position, item) in cart.items.iter().enumerate() {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                CartError::InvalidQuantity(format!("quantity {} is too large", item.quantity))
            })?;

            sqlx::query(
                r#"
                INSERT INTO cart_items (cart_id, product_id, quantity, price_cents, added_at, position)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(cart.id.as_i64())
            .bind(item.product_id.as_i64())
            .bind(quantity)
            .bind(item.price.cents())
            .bind(item.added_at)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
