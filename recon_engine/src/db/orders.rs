use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{LineItem, OrderId, OrderRecord};

/// Returns the identifiers of all tracked orders whose details have not been durably captured yet, most recently
/// inserted first.
pub async fn fetch_incomplete_tracked(conn: &mut SqliteConnection) -> Result<Vec<OrderId>, sqlx::Error> {
    let order_ids =
        sqlx::query_scalar("SELECT order_id FROM order_tracking WHERE complete = FALSE ORDER BY id DESC")
            .fetch_all(conn)
            .await?;
    Ok(order_ids)
}

/// Registers an order in the tracking table with an unset completion flag. Returns `false` when the order was
/// already tracked.
pub async fn track_order(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("INSERT OR IGNORE INTO order_tracking (order_id, complete) VALUES ($1, FALSE)")
        .bind(order_id.as_str())
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Sets the completion flag on an order's tracking entry. Returns `false` when no tracking entry exists; tracking is
/// opt-in, so that is not an error.
pub async fn set_tracking_complete(
    order_id: &OrderId,
    complete: bool,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE order_tracking SET complete = $1 WHERE order_id = $2")
        .bind(complete)
        .bind(order_id.as_str())
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Deletes all line-item rows for one order. Returns the number of rows removed.
pub async fn delete_line_items(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM order_line_items WHERE order_id = $1").bind(order_id.as_str()).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Deletes the line-item rows for every order in `order_ids` in one statement. Used by the pre-dispatch bulk clean.
pub async fn delete_line_items_bulk(order_ids: &[OrderId], conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    if order_ids.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::new("DELETE FROM order_line_items WHERE order_id IN (");
    let mut values = builder.separated(", ");
    for order_id in order_ids {
        values.push_bind(order_id.as_str());
    }
    builder.push(")");
    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}

/// Inserts one line-item row for the given record. The order-level columns (paid-at, status, settled flag) are
/// denormalized onto every row.
pub async fn insert_line_item(
    record: &OrderRecord,
    item: &LineItem,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO order_line_items (
                order_id,
                paid_at,
                status,
                product_name,
                quantity,
                unit_price,
                line_total,
                complete
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(record.order_id.as_str())
    .bind(&record.paid_at)
    .bind(&record.status)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.line_total)
    .bind(record.is_settled())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn tracked_count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM order_tracking").fetch_one(conn).await
}

pub async fn incomplete_count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM order_tracking WHERE complete = FALSE").fetch_one(conn).await
}

pub async fn line_item_count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM order_line_items").fetch_one(conn).await
}
