//! # Order Repository
//!
//! Read side of the ledger. Orders are only ever written by the
//! [`CheckoutEngine`](crate::checkout::CheckoutEngine); this repository
//! never modifies them.

use kasir_core::{Order, OrderLine};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Largest page `list_recent` will return.
pub const MAX_RECENT_ORDERS: u32 = 200;

/// Repository for reading committed orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order with its lines.
    ///
    /// Header and lines are read in one transaction. Lines come back in the
    /// order they were requested at checkout.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            "SELECT id, total_amount, created_at FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut order) = order else {
            return Ok(None);
        };

        order.details = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT id, order_id, product_id, product_name, quantity, subtotal
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = %id, lines = order.details.len(), "Loaded order");
        Ok(Some(order))
    }

    /// Lists the most recent orders, newest first, without their lines.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let limit = limit.min(MAX_RECENT_ORDERS);

        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, total_amount, created_at FROM orders ORDER BY id DESC LIMIT ?1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts all orders ever committed.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
