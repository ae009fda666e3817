use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MatchResult;

/// Elapsed time and volume counters for one pipeline run.
///
/// Returned with every response, including failed ones: whatever was
/// measured before the failure is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryMetrics {
    pub preprocess_ms: u64,
    pub extract_ms: u64,
    pub retrieve_ms: u64,
    pub consolidate_ms: u64,
    pub verify_ms: u64,
    pub total_ms: u64,
    pub scenes_total: usize,
    pub scenes_sampled: usize,
    pub candidates_retrieved: usize,
    pub candidates_consolidated: usize,
}

/// Terminal status of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Completed,
    /// The verification deadline expired; results are best-effort partial.
    PartialTimeout,
    Failed,
}

/// Full response for one identification query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<MatchResult>,
    pub metrics: QueryMetrics,
    pub status: QueryStatus,
    /// Present only when `status == Failed`.
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn completed(id: String, results: Vec<MatchResult>, metrics: QueryMetrics) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            results,
            metrics,
            status: QueryStatus::Completed,
            error: None,
        }
    }

    pub fn partial(id: String, results: Vec<MatchResult>, metrics: QueryMetrics) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            results,
            metrics,
            status: QueryStatus::PartialTimeout,
            error: None,
        }
    }

    /// A terminal failure. Carries the metrics gathered so far and no matches.
    pub fn failed(id: String, metrics: QueryMetrics, error: String) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            results: Vec::new(),
            metrics,
            status: QueryStatus::Failed,
            error: Some(error),
        }
    }
}
