//! Push gateway configuration.

use serde::{Deserialize, Serialize};

/// Store-and-forward push notification gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Push gateway endpoint URL.
    pub endpoint: String,
    /// Optional bearer token for the gateway.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Maximum tokens per gateway batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Request timeout for a single gateway call, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_batch_size() -> usize {
    100
}

fn default_request_timeout() -> u64 {
    10
}
