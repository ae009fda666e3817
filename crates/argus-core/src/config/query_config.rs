use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::features::FeatureType;

/// Query-engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub cache_capacity: u64,
    /// Cache staleness bound. Inserts never invalidate cached queries;
    /// TTL expiry is the only consistency mechanism.
    pub cache_ttl_secs: u64,
    /// Query vectors per store request; larger inputs are chunked.
    pub batch_size: usize,
    /// Scene fusion queries `top_k * oversample_factor` per modality.
    pub oversample_factor: usize,
    /// Per-modality collection overrides. Unlisted types use the
    /// `features_<type>` convention.
    pub collection_overrides: HashMap<FeatureType, String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            cache_capacity: defaults::DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            oversample_factor: defaults::DEFAULT_OVERSAMPLE_FACTOR,
            collection_overrides: HashMap::new(),
        }
    }
}
