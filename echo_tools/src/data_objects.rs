use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope returned by the status-aggregation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: StatsData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsData {
    #[serde(default)]
    pub incomplete_order_ids: Vec<String>,
}

/// Envelope returned by the order-detail endpoint. The payload under `data` is not contractually fixed, so it is
/// kept as a raw [`Value`] and walked tolerantly by [`crate::helpers::extract_order_detail`].
#[derive(Debug, Clone, Deserialize)]
pub struct DetailEnvelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

/// One product line as reported by the remote API. Prices arrive as floating-point values; truncation to whole
/// currency units happens when the record is normalized for persistence, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub product_name: String,
    pub price: f64,
    pub amount: i64,
}

/// The details of one order, extracted defensively from the remote payload. Fields the remote omitted (or sent with
/// an unexpected type) are empty/zero rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: String,
    /// Raw paid-at value, a Unix epoch in string form when present.
    pub paid_at: String,
    pub status: String,
    pub products: Vec<ProductLine>,
}
