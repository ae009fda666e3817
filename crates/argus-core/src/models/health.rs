use serde::{Deserialize, Serialize};

/// Coarse health of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health report for the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHealth {
    pub status: HealthStatus,
    /// Which backend is currently serving operations.
    pub backend: String,
    pub message: Option<String>,
}
