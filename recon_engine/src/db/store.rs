use std::fmt::Debug;

use log::debug;
use sqlx::SqlitePool;

use super::{new_pool, orders, OrderDbError};
use crate::db_types::{LineItem, OrderId, OrderRecord};

/// Aggregate counts over the local store, for operator-facing status output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreStats {
    pub tracked_orders: i64,
    pub incomplete_orders: i64,
    pub line_item_rows: i64,
}

/// The SQLite-backed reconciliation store.
#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, OrderDbError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), OrderDbError> {
        sqlx::migrate!("./src/db/migrations").run(&self.pool).await?;
        Ok(())
    }

    /// The local half of the work set: tracked orders whose completion flag is still unset, most recent first.
    pub async fn incomplete_tracked_orders(&self) -> Result<Vec<OrderId>, OrderDbError> {
        let mut conn = self.pool.acquire().await?;
        let order_ids = orders::fetch_incomplete_tracked(&mut conn).await?;
        Ok(order_ids)
    }

    /// Registers an order for detail tracking. Idempotent; returns `false` if the order was already tracked.
    pub async fn track_order(&self, order_id: &OrderId) -> Result<bool, OrderDbError> {
        let mut conn = self.pool.acquire().await?;
        let inserted = orders::track_order(order_id, &mut conn).await?;
        Ok(inserted)
    }

    /// Deletes the stored line items for every order in the resolved work set, in a single transaction.
    ///
    /// Running this before dispatch keeps each order's rows either fully absent (pending a fetch) or fully current
    /// (written by the most recent successful fetch); a partially failed run never mixes stale rows with fresh ones.
    pub async fn clear_line_items(&self, order_ids: &[OrderId]) -> Result<u64, OrderDbError> {
        if order_ids.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        let removed = orders::delete_line_items_bulk(order_ids, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Pre-clean removed {removed} line-item rows for {} orders", order_ids.len());
        Ok(removed)
    }

    /// Persists one fetched order atomically: replaces all of its line-item rows (inserting the single sentinel row
    /// when the order has none) and updates the tracking entry's completion flag when one exists. Any step failure
    /// rolls the whole transaction back, so no order is ever left half-written.
    pub async fn write_order(&self, record: &OrderRecord) -> Result<(), OrderDbError> {
        if record.order_id.as_str().trim().is_empty() {
            return Err(OrderDbError::EmptyOrderId);
        }
        let mut tx = self.pool.begin().await?;
        orders::delete_line_items(&record.order_id, &mut tx).await?;
        if record.items.is_empty() {
            orders::insert_line_item(record, &LineItem::sentinel(), &mut tx).await?;
        } else {
            for item in &record.items {
                orders::insert_line_item(record, item, &mut tx).await?;
            }
        }
        let tracked = orders::set_tracking_complete(&record.order_id, record.is_terminal(), &mut tx).await?;
        if !tracked {
            debug!("🗃️ Order [{}] has no tracking entry. Completion flag left untouched.", record.order_id);
        }
        tx.commit().await?;
        debug!("🗃️ Order [{}] saved with {} line item(s)", record.order_id, record.items.len().max(1));
        Ok(())
    }

    pub async fn store_stats(&self) -> Result<StoreStats, OrderDbError> {
        let mut conn = self.pool.acquire().await?;
        let tracked_orders = orders::tracked_count(&mut conn).await?;
        let incomplete_orders = orders::incomplete_count(&mut conn).await?;
        let line_item_rows = orders::line_item_count(&mut conn).await?;
        Ok(StoreStats { tracked_orders, incomplete_orders, line_item_rows })
    }
}
