use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the bridge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Where the three well-known artifacts live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactConfig {
    /// Directory shared with the execution process.
    #[serde(default = "default_dir")]
    pub dir: String,
    /// File the currency pair is written to.
    #[serde(default = "default_query_request")]
    pub query_request: String,
    /// File the execution process writes the price history to.
    #[serde(default = "default_query_result")]
    pub query_result: String,
    /// File trade orders are written to.
    #[serde(default = "default_trade_order")]
    pub trade_order: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            query_request: default_query_request(),
            query_result: default_query_result(),
            trade_order: default_trade_order(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollingConfig {
    /// Delay between existence checks on the query-result artifact.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Give up waiting after this many seconds. 0 waits forever.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

fn default_dir() -> String {
    ".".to_string()
}
fn default_query_request() -> String {
    "currency_pair.txt".to_string()
}
fn default_query_result() -> String {
    "currency_pair_history.csv".to_string()
}
fn default_trade_order() -> String {
    "trade_order.json".to_string()
}
fn default_interval_ms() -> u64 {
    1000
}
fn default_timeout_seconds() -> u64 {
    120
}
