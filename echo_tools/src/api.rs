use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::json;

use crate::{
    config::EchoApiConfig,
    data_objects::{DetailEnvelope, OrderDetail, StatsResponse},
    helpers::extract_order_detail,
    EchoApiError,
};

/// Bounds one request, including the body read. There is no automatic retry on top of this; a timed-out order is
/// counted as failed and stays eligible for the next run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct EchoApi {
    config: EchoApiConfig,
    client: Arc<Client>,
}

impl EchoApi {
    pub fn new(config: EchoApiConfig) -> Result<Self, EchoApiError> {
        let headers = build_headers(&config)?;
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .gzip(true)
            .build()
            .map_err(|e| EchoApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Asks the status-aggregation endpoint which orders are still missing complete details.
    pub async fn incomplete_order_ids(&self) -> Result<Vec<String>, EchoApiError> {
        debug!("Querying the status source for incomplete orders");
        let response = self
            .client
            .get(&self.config.stats_url)
            .send()
            .await
            .map_err(|e| EchoApiError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| EchoApiError::Transport(e.to_string()))?;
            return Err(EchoApiError::Query { status, message });
        }
        let body = response.text().await.map_err(|e| EchoApiError::Transport(e.to_string()))?;
        let stats: StatsResponse = serde_json::from_str(&body).map_err(|e| EchoApiError::Decode(e.to_string()))?;
        if !stats.success {
            return Err(EchoApiError::Rejected(stats.message));
        }
        info!("Status source reports {} incomplete order(s)", stats.data.incomplete_order_ids.len());
        Ok(stats.data.incomplete_order_ids)
    }

    /// Fetches and decodes the details of a single order. The response may be gzip-compressed; the client
    /// decompresses transparently before decoding.
    pub async fn order_detail(&self, order_id: &str) -> Result<OrderDetail, EchoApiError> {
        trace!("Fetching details for order {order_id}");
        let body = json!({ "orderId": order_id });
        let response = self
            .client
            .post(&self.config.detail_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EchoApiError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| EchoApiError::Transport(e.to_string()))?;
            return Err(EchoApiError::Query { status, message });
        }
        let body = response.text().await.map_err(|e| EchoApiError::Transport(e.to_string()))?;
        let envelope: DetailEnvelope = serde_json::from_str(&body).map_err(|e| EchoApiError::Decode(e.to_string()))?;
        if envelope.code != 0 {
            return Err(EchoApiError::Rejected(envelope.message));
        }
        trace!("Order {order_id} decoded");
        Ok(extract_order_detail(&envelope.data))
    }
}

/// Builds the full header set sent with every request: the fixed protocol headers, the device/app identity from the
/// [`DeviceProfile`](crate::DeviceProfile), and the three per-run credential headers.
fn build_headers(config: &EchoApiConfig) -> Result<HeaderMap, EchoApiError> {
    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", HeaderValue::from_static("application/json"));
    headers.insert("Cache-Control", HeaderValue::from_static("max-age=3600"));
    headers.insert("X-Request-Device", HeaderValue::from_static("android"));
    headers.insert("X-Request-Sign-Type", HeaderValue::from_static("RSA2"));
    headers.insert("X-Request-Sign-Version", HeaderValue::from_static("v1"));
    headers.insert("X-Request-Package-Sign-Version", HeaderValue::from_static("0.0.3"));
    headers.insert("X-Request-Id", HeaderValue::from_static(""));
    headers.insert("X-Echo-Teen-Mode", HeaderValue::from_static("false"));
    headers.insert("X-Echo-City-Code", HeaderValue::from_static(""));

    let device = &config.device;
    let dynamic = [
        ("X-Request-Version", device.app_version.as_str()),
        ("X-Device-Id", device.device_id.as_str()),
        ("X-Echo-Install-Id", device.install_id.as_str()),
        ("X-Client-Package-Id", device.package_id.as_str()),
        ("X-Request-Package-Id", device.package_id.as_str()),
        ("X-Request-Channel", device.channel.as_str()),
        ("Downloadchannel", device.channel.as_str()),
        ("X-Request-Utm_source", device.channel.as_str()),
        ("X-Echo-Region", device.region.as_str()),
        ("Accept-Language", device.language.as_str()),
        ("User-Agent", device.user_agent.as_str()),
        ("Referer", device.referer.as_str()),
        ("X-Request-Timestamp", config.credentials.timestamp.as_str()),
        ("X-Request-Sign", config.credentials.sign.reveal().as_str()),
        ("Authorization", config.credentials.authorization.reveal().as_str()),
    ];
    for (name, value) in dynamic {
        let value = HeaderValue::from_str(value)
            .map_err(|e| EchoApiError::Initialization(format!("invalid value for header {name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}
