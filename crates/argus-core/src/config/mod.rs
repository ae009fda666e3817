//! Configuration: one struct per subsystem, composed into `ArgusConfig`.

pub mod defaults;

mod matching_config;
mod pipeline_config;
mod query_config;
mod store_config;

pub use matching_config::MatchingConfig;
pub use pipeline_config::{PipelineConfig, SamplingStrategy};
pub use query_config::QueryConfig;
pub use store_config::{FallbackMode, StoreConfig};

use serde::{Deserialize, Serialize};

use crate::errors::{ArgusError, ArgusResult};

/// Top-level configuration for the whole system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArgusConfig {
    pub store: StoreConfig,
    pub query: QueryConfig,
    pub matching: MatchingConfig,
    pub pipeline: PipelineConfig,
}

impl ArgusConfig {
    /// Parse a TOML document. Missing sections and fields take defaults.
    pub fn from_toml_str(raw: &str) -> ArgusResult<Self> {
        toml::from_str(raw).map_err(|e| ArgusError::ConfigError {
            reason: e.to_string(),
        })
    }

    /// Load from a TOML file on disk.
    pub fn load(path: &std::path::Path) -> ArgusResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
