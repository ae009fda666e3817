use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one fallback activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationEvent {
    /// Component that degraded, e.g. "vector-store".
    pub component: String,
    /// What failed.
    pub failure: String,
    /// What took over.
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

impl DegradationEvent {
    pub fn new(
        component: impl Into<String>,
        failure: impl Into<String>,
        fallback_used: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            failure: failure.into(),
            fallback_used: fallback_used.into(),
            timestamp: Utc::now(),
        }
    }
}
