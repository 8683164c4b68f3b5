use async_trait::async_trait;
use echo_tools::{EchoApi, EchoApiError, OrderDetail};

/// The remote side of the pipeline, as the resolver and the dispatcher see it. [`EchoApi`] is the production
/// implementation; tests substitute an in-memory mock.
#[async_trait]
pub trait RemoteOrderSource: Send + Sync {
    /// The remote-reported list of orders whose details are incomplete.
    async fn incomplete_order_ids(&self) -> Result<Vec<String>, EchoApiError>;
    /// The decoded details of one order.
    async fn order_detail(&self, order_id: &str) -> Result<OrderDetail, EchoApiError>;
}

#[async_trait]
impl RemoteOrderSource for EchoApi {
    async fn incomplete_order_ids(&self) -> Result<Vec<String>, EchoApiError> {
        EchoApi::incomplete_order_ids(self).await
    }

    async fn order_detail(&self, order_id: &str) -> Result<OrderDetail, EchoApiError> {
        EchoApi::order_detail(self, order_id).await
    }
}

#[cfg(test)]
pub mod mock {
    use std::collections::{HashMap, HashSet};

    use echo_tools::{EchoApiError, OrderDetail, ProductLine};
    use tokio::sync::Mutex;

    use super::{async_trait, RemoteOrderSource};

    /// In-memory stand-in for the Echo API. Orders without an explicit entry in `details` succeed with a default
    /// single-product detail; identifiers listed in `transport_failures` fail with a transport error.
    #[derive(Default)]
    pub struct MockSource {
        pub incomplete: Vec<String>,
        pub stats_error: bool,
        pub transport_failures: HashSet<String>,
        pub details: HashMap<String, OrderDetail>,
        pub calls: Mutex<HashMap<String, usize>>,
    }

    impl MockSource {
        pub fn default_detail(order_id: &str) -> OrderDetail {
            OrderDetail {
                order_id: order_id.to_string(),
                paid_at: "1700000000".to_string(),
                status: "trade succeeded".to_string(),
                products: vec![ProductLine { product_name: "widget".to_string(), price: 10.0, amount: 1 }],
            }
        }
    }

    #[async_trait]
    impl RemoteOrderSource for MockSource {
        async fn incomplete_order_ids(&self) -> Result<Vec<String>, EchoApiError> {
            if self.stats_error {
                return Err(EchoApiError::Transport("status source unreachable".to_string()));
            }
            Ok(self.incomplete.clone())
        }

        async fn order_detail(&self, order_id: &str) -> Result<OrderDetail, EchoApiError> {
            *self.calls.lock().await.entry(order_id.to_string()).or_insert(0) += 1;
            if self.transport_failures.contains(order_id) {
                return Err(EchoApiError::Transport("connection reset by peer".to_string()));
            }
            Ok(self.details.get(order_id).cloned().unwrap_or_else(|| Self::default_detail(order_id)))
        }
    }
}
