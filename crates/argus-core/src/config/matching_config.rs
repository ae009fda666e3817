use serde::{Deserialize, Serialize};

use super::defaults;

/// Matching-engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Results below this confidence are dropped before ranking.
    pub min_confidence: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_confidence: defaults::DEFAULT_MIN_CONFIDENCE,
        }
    }
}
