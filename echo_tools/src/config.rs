use log::*;
use recon_common::Secret;

pub const DEFAULT_DETAIL_URL: &str = "https://api.qiandao.cn/order-web/user/v3/load-order-details";
pub const DEFAULT_STATS_URL: &str = "http://localhost:8000/api/db-stats";

/// The three credential headers supplied once per run. The client never refreshes or recomputes them; they are
/// assumed valid for the duration of the run.
#[derive(Debug, Clone, Default)]
pub struct RunCredentials {
    pub sign: Secret<String>,
    pub timestamp: String,
    pub authorization: Secret<String>,
}

impl RunCredentials {
    pub fn new<S: Into<String>>(sign: S, timestamp: S, authorization: S) -> Self {
        Self {
            sign: Secret::new(sign.into()),
            timestamp: timestamp.into(),
            authorization: Secret::new(authorization.into()),
        }
    }
}

/// The device/app identity the client presents. Header *names* are fixed by the wire contract; the values here are
/// just the profile of the device the credentials were captured on.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    pub app_version: String,
    pub device_id: String,
    pub install_id: String,
    pub package_id: String,
    pub channel: String,
    pub region: String,
    pub language: String,
    pub user_agent: String,
    pub referer: String,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            app_version: "5.91.1".to_string(),
            device_id: "6ec1e3cac888f55d".to_string(),
            install_id: "ODY5NjE4MjM0NDA2NTAyOTQ5".to_string(),
            package_id: "1006".to_string(),
            channel: "xiaomi".to_string(),
            region: "CN".to_string(),
            language: "zh-CN".to_string(),
            user_agent: "Kuril+/5.91.1 (Android 15)".to_string(),
            referer: "https://qiandao.cn".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EchoApiConfig {
    pub detail_url: String,
    pub stats_url: String,
    pub device: DeviceProfile,
    pub credentials: RunCredentials,
}

impl Default for EchoApiConfig {
    fn default() -> Self {
        Self {
            detail_url: DEFAULT_DETAIL_URL.to_string(),
            stats_url: DEFAULT_STATS_URL.to_string(),
            device: DeviceProfile::default(),
            credentials: RunCredentials::default(),
        }
    }
}

impl EchoApiConfig {
    pub fn new_from_env_or_default(credentials: RunCredentials) -> Self {
        let detail_url = std::env::var("ORS_ECHO_API_URL").unwrap_or_else(|_| {
            warn!("ORS_ECHO_API_URL not set, using the default order detail endpoint");
            DEFAULT_DETAIL_URL.to_string()
        });
        let stats_url = std::env::var("ORS_STATS_URL").unwrap_or_else(|_| {
            warn!("ORS_STATS_URL not set, using the default status source");
            DEFAULT_STATS_URL.to_string()
        });
        Self { detail_url, stats_url, device: DeviceProfile::default(), credentials }
    }
}
