use serde::{Deserialize, Serialize};

use super::defaults;

/// How stage 3 reduces N scenes to at most `max_scenes_per_query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Evenly spaced scene indices.
    Uniform,
    /// A third from the start, a third from the end, the rest interpolated.
    StartEndWeighted,
    /// Rank scenes by visual interest, keep the top N in temporal order.
    #[default]
    Keyframe,
}

/// Query-pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_scenes_per_query: usize,
    pub sampling_strategy: SamplingStrategy,
    /// Inflated per-scene top-k handed to retrieval so consolidation has
    /// enough evidence to align.
    pub prefetch_candidates: usize,
    pub temporal_alignment: bool,
    /// Two candidates share an alignment bucket when their offsets differ
    /// by at most this many seconds.
    pub alignment_window_secs: f64,
    /// Fixed number of concurrent detailed-verification workers.
    pub verification_concurrency: usize,
    /// Per-candidate top-k used during detailed verification.
    pub verification_top_k: usize,
    /// Request-scoped deadline; expiry aborts outstanding verification
    /// tasks and returns best-effort partial results.
    pub query_deadline_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_scenes_per_query: defaults::DEFAULT_MAX_SCENES_PER_QUERY,
            sampling_strategy: SamplingStrategy::default(),
            prefetch_candidates: defaults::DEFAULT_PREFETCH_CANDIDATES,
            temporal_alignment: true,
            alignment_window_secs: defaults::DEFAULT_ALIGNMENT_WINDOW_SECS,
            verification_concurrency: defaults::DEFAULT_VERIFICATION_CONCURRENCY,
            verification_top_k: defaults::DEFAULT_VERIFICATION_TOP_K,
            query_deadline_ms: defaults::DEFAULT_QUERY_DEADLINE_MS,
        }
    }
}
