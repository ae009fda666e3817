use serde::{Deserialize, Serialize};

use super::defaults;

/// Policy controlling use of the local fallback store versus the remote
/// vector backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Probe the remote with bounded retries; degrade to local on failure.
    #[default]
    Auto,
    /// Skip the remote entirely and serve everything locally.
    Always,
    /// Surface connection errors instead of degrading.
    Never,
}

/// Vector-store subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Remote backend base URL.
    pub endpoint: String,
    pub fallback_mode: FallbackMode,
    /// Directory holding one serialized record per fallback collection.
    pub fallback_dir: String,
    /// Connection-probe retry budget. Retries exist only here; operation
    /// failures degrade instead of retrying.
    pub connect_max_attempts: u32,
    pub connect_base_delay_ms: u64,
    pub connect_max_delay_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_ENDPOINT.to_string(),
            fallback_mode: FallbackMode::default(),
            fallback_dir: defaults::DEFAULT_FALLBACK_DIR.to_string(),
            connect_max_attempts: defaults::DEFAULT_CONNECT_MAX_ATTEMPTS,
            connect_base_delay_ms: defaults::DEFAULT_CONNECT_BASE_DELAY_MS,
            connect_max_delay_ms: defaults::DEFAULT_CONNECT_MAX_DELAY_MS,
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}
