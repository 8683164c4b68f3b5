use std::{collections::VecDeque, sync::Arc};

use echo_tools::{EchoApiError, OrderDetail};
use log::{info, warn};
use recon_engine::{
    db_types::{LineItem, OrderId, OrderRecord},
    OrderDbError,
    SqliteDatabase,
};
use thiserror::Error;
use tokio::{sync::Mutex, task::JoinSet};

use crate::source::RemoteOrderSource;

/// Success/failure counts for one dispatch run. Counts are deterministic for a given set of per-order outcomes even
/// though completion order across identifiers is not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub success: u64,
    pub failed: u64,
}

impl RunTotals {
    pub fn completed(&self) -> u64 {
        self.success + self.failed
    }
}

#[derive(Debug, Error)]
enum OrderError {
    #[error(transparent)]
    Api(#[from] EchoApiError),
    #[error(transparent)]
    Store(#[from] OrderDbError),
}

/// Fans the work set out across a bounded pool of workers, each running fetch → normalize → write for one order at a
/// time until the shared queue is drained.
///
/// Every identifier is claimed exactly once. A per-order failure at any stage increments the failure counter and
/// never aborts sibling workers; the run terminates only when every claimed identifier has completed. The queue and
/// the counters are the only shared mutable state, each guarded by a mutex that is never held across I/O.
pub async fn run(
    source: Arc<dyn RemoteOrderSource>,
    db: SqliteDatabase,
    work_set: Vec<OrderId>,
    max_workers: usize,
) -> RunTotals {
    let total = work_set.len();
    if total == 0 || max_workers == 0 {
        return RunTotals::default();
    }
    let queue = Arc::new(Mutex::new(VecDeque::from(work_set)));
    let totals = Arc::new(Mutex::new(RunTotals::default()));
    let workers = max_workers.min(total);
    info!("Dispatching {total} order(s) across {workers} worker(s)");

    let mut pool = JoinSet::new();
    for _ in 0..workers {
        let queue = Arc::clone(&queue);
        let totals = Arc::clone(&totals);
        let source = Arc::clone(&source);
        let db = db.clone();
        pool.spawn(async move {
            loop {
                let next = queue.lock().await.pop_front();
                let Some(order_id) = next else {
                    break;
                };
                let outcome = process_order(source.as_ref(), &db, &order_id).await;
                if let Err(e) = &outcome {
                    warn!("Order {order_id} failed: {e}");
                }
                let mut totals = totals.lock().await;
                match outcome {
                    Ok(()) => totals.success += 1,
                    Err(_) => totals.failed += 1,
                }
                let done = totals.completed();
                if done % 10 == 0 {
                    info!("Progress: {} succeeded, {} failed, {done}/{total}", totals.success, totals.failed);
                }
            }
        });
    }
    while pool.join_next().await.is_some() {}

    let totals = *totals.lock().await;
    info!("Dispatch complete. {} succeeded, {} failed, {} total", totals.success, totals.failed, totals.completed());
    totals
}

/// One order's pipeline: fetch, normalize, write. Stages run strictly in this sequence for a given identifier.
async fn process_order(
    source: &dyn RemoteOrderSource,
    db: &SqliteDatabase,
    order_id: &OrderId,
) -> Result<(), OrderError> {
    let detail = source.order_detail(order_id.as_str()).await?;
    let record = order_record_from_detail(detail);
    db.write_order(&record).await?;
    Ok(())
}

/// Completes normalization of a fetched detail: raw product lines become truncated-price line items and the paid-at
/// epoch becomes local calendar time.
pub fn order_record_from_detail(detail: OrderDetail) -> OrderRecord {
    let items =
        detail.products.iter().map(|p| LineItem::new(p.product_name.as_str(), p.amount, p.price)).collect();
    OrderRecord::new(OrderId::from(detail.order_id), &detail.paid_at, detail.status, items)
}
