use std::sync::Arc;

use log::info;
use recon_engine::{db_types::OrderId, helpers::merge_work_set, OrderDbError, SqliteDatabase};
use thiserror::Error;

use crate::{
    dispatcher::{self, RunTotals},
    source::RemoteOrderSource,
};

/// Failures that abort a run before any order is dispatched. Per-order failures never surface here; they are
/// counted inside the dispatcher instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("The remote status source is unavailable: {0}")]
    Upstream(String),
    #[error("The local order store is unavailable: {0}")]
    Store(#[from] OrderDbError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub work_set_size: usize,
    pub totals: RunTotals,
}

/// Derives the deduplicated work set for one run: the remote-reported incomplete orders first, then local-only
/// tracked orders in their query order. Read-only; the pre-clean belongs to [`run_sync`].
pub async fn resolve_work_set(
    source: &dyn RemoteOrderSource,
    db: &SqliteDatabase,
) -> Result<Vec<OrderId>, PipelineError> {
    let remote = source.incomplete_order_ids().await.map_err(|e| PipelineError::Upstream(e.to_string()))?;
    info!("The status source reports {} incomplete order(s)", remote.len());
    let local = db.incomplete_tracked_orders().await?;
    info!("The local store tracks {} incomplete order(s)", local.len());
    Ok(merge_work_set(remote.into_iter().map(OrderId::from), local))
}

/// Runs the full pipeline: resolve the work set, bulk pre-clean its stale line items, dispatch the concurrent
/// fetch/write workers, and report the totals.
pub async fn run_sync(
    source: Arc<dyn RemoteOrderSource>,
    db: SqliteDatabase,
    max_workers: usize,
) -> Result<RunSummary, PipelineError> {
    let work_set = resolve_work_set(source.as_ref(), &db).await?;
    info!("{} order(s) to process after merge and dedup", work_set.len());
    if work_set.is_empty() {
        info!("No orders need details. Nothing to do.");
        return Ok(RunSummary::default());
    }
    let removed = db.clear_line_items(&work_set).await?;
    info!("Pre-clean removed {removed} stale line-item row(s) for {} order(s)", work_set.len());
    let work_set_size = work_set.len();
    let totals = dispatcher::run(source, db, work_set, max_workers).await;
    Ok(RunSummary { work_set_size, totals })
}

#[cfg(test)]
mod test {
    use echo_tools::{OrderDetail, ProductLine};
    use recon_engine::test_utils::new_test_database;

    use super::*;
    use crate::source::mock::MockSource;

    #[tokio::test]
    async fn the_work_set_is_the_ordered_union_of_both_sources() {
        let db = new_test_database().await;
        // Tracked most-recent-first, so the local half reads B then C.
        db.track_order(&"C".into()).await.unwrap();
        db.track_order(&"B".into()).await.unwrap();

        let source = MockSource { incomplete: vec!["A".to_string(), "B".to_string()], ..MockSource::default() };
        let work_set = resolve_work_set(&source, &db).await.unwrap();
        assert_eq!(work_set, vec![OrderId::from("A"), OrderId::from("B"), OrderId::from("C")]);
    }

    #[tokio::test]
    async fn an_unreachable_status_source_aborts_the_run() {
        let db = new_test_database().await;
        let source = MockSource { stats_error: true, ..MockSource::default() };
        let err = run_sync(Arc::new(source), db, 4).await.unwrap_err();
        assert!(matches!(err, PipelineError::Upstream(_)));
    }

    #[tokio::test]
    async fn an_empty_work_set_short_circuits() {
        let db = new_test_database().await;
        let summary = run_sync(Arc::new(MockSource::default()), db, 4).await.unwrap();
        assert_eq!(summary.work_set_size, 0);
        assert_eq!(summary.totals, RunTotals::default());
    }

    #[tokio::test]
    async fn a_full_run_replaces_stale_rows_wholesale() {
        let db = new_test_database().await;
        // A previous run captured A with a different product line.
        let stale = recon_engine::db_types::OrderRecord::new(
            "A".into(),
            "",
            "awaiting shipment",
            vec![recon_engine::db_types::LineItem::new("old stock", 9, 1.0)],
        );
        db.write_order(&stale).await.unwrap();

        let mut source = MockSource { incomplete: vec!["A".to_string()], ..MockSource::default() };
        source.details.insert("A".to_string(), OrderDetail {
            order_id: "A".to_string(),
            paid_at: "1700000000".to_string(),
            status: "trade succeeded".to_string(),
            products: vec![ProductLine { product_name: "fresh stock".to_string(), price: 5.5, amount: 2 }],
        });

        let summary = run_sync(Arc::new(source), db.clone(), 4).await.unwrap();
        assert_eq!(summary.work_set_size, 1);
        assert_eq!(summary.totals, RunTotals { success: 1, failed: 0 });

        let names: Vec<String> =
            sqlx::query_scalar("SELECT product_name FROM order_line_items WHERE order_id = 'A'")
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(names, vec!["fresh stock".to_string()]);
    }
}
