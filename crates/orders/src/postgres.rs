use std::collections::HashMap;

use async_trait::async_trait;
use common::{Money, OrderId, ProductId, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{NewOrder, Order, OrderItem, OrderStatus, Result, repository::OrderRepository};

/// PostgreSQL-backed order repository.
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new repository over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_order(row: &PgRow) -> Result<Order> {
        let status: String = row.try_get("status")?;
        Ok(Order {
            id: OrderId::new(row.try_get("id")?),
            order_number: row.try_get("order_number")?,
            user_id: UserId::new(row.try_get("user_id")?),
            status: status.parse()?,
            total_amount: Money::from_cents(row.try_get("total_cents")?),
            shipping_address: row.try_get("shipping_address")?,
            billing_address: row.try_get("billing_address")?,
            created_at: row.try_get("created_at")?,
            items: Vec::new(),
        })
    }

    fn row_to_item(row: &PgRow) -> Result<OrderItem> {
        let quantity: i32 = row.try_get("quantity")?;
        Ok(OrderItem {
            order_id: OrderId::new(row.try_get("order_id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            product_name: row.try_get("product_name")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            subtotal: Money::from_cents(row.try_get("subtotal_cents")?),
        })
    }

    async fn attach_items(&self, orders: &mut [Order]) -> Result<()> {
        if orders.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = orders.iter().map(|order| order.id.as_i64()).collect();
        let rows = sqlx::query(
            r#"
            SELECT order_id, product_id, product_name, price_cents, quantity, subtotal_cents
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in &rows {
            let item = Self::row_to_item(row)?;
            by_order.entry(item.order_id).or_default().push(item);
        }
        for order in orders {
            order.items = by_order.remove(&order.id).unwrap_or_default();
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (order_number, user_id, status, total_cents, shipping_address, billing_address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at
            "#,
        )
        .bind(&order.order_number)
        .bind(order.user_id.as_i64())
        .bind(order.status.as_str())
        .bind(order.total_amount.cents())
        .bind(&order.shipping_address)
        .bind(&order.billing_address)
        .fetch_one(&mut *tx)
        .await?;

        let id = OrderId::new(row.try_get("id")?);
        let created_at = row.try_get("created_at")?;

        for item in &order.items {
            let quantity = i32::try_from(item.quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, product_name, price_cents, quantity, subtotal_cents)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(id.as_i64())
            .bind(item.product_id.as_i64())
            .bind(&item.product_name)
            .bind(item.price.cents())
            .bind(quantity)
            .bind(item.subtotal.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order.into_order(id, created_at))
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, order_number, user_id, status, total_cents, shipping_address, billing_address, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut orders = [Self::row_to_order(&row)?];
        self.attach_items(&mut orders).await?;
        let [order] = orders;
        Ok(Some(order))
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_number, user_id, status, total_cents, shipping_address, billing_address, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let mut orders = rows
            .iter()
            .map(Self::row_to_order)
            .collect::<Result<Vec<_>>>()?;
        self.attach_items(&mut orders).await?;
        Ok(orders)
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
