use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::features::FeatureType;

/// A content id surfaced by first-stage retrieval for one query scene.
///
/// Ephemeral: candidates live only between retrieval and consolidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub content_id: String,
    /// Weighted fusion score accumulated across modalities.
    pub score: f64,
    /// Which modalities contributed evidence for this candidate.
    pub matched_feature_types: BTreeSet<FeatureType>,
    /// Index of the query scene that produced this candidate.
    pub query_scene_index: usize,
    /// Start time of the query scene, in seconds.
    pub query_timestamp: f64,
    /// Position of the matched segment within the target content.
    pub target_timestamp: Option<f64>,
}

impl Candidate {
    /// Temporal offset between target and query, when both are known.
    ///
    /// Candidates of the same content matching at a consistent offset
    /// are evidence of a true match rather than coincidental similarity.
    pub fn offset(&self) -> Option<f64> {
        self.target_timestamp.map(|t| t - self.query_timestamp)
    }
}

/// A bucket of same-content candidates whose offsets agree within the
/// alignment window. Ephemeral, created during consolidation.
#[derive(Debug, Clone)]
pub struct AlignmentGroup {
    /// Offset of the bucket's anchor candidate, in seconds.
    pub offset: f64,
    pub matches: Vec<Candidate>,
}

impl AlignmentGroup {
    pub fn new(anchor: Candidate) -> Self {
        Self {
            offset: anchor.offset().unwrap_or(0.0),
            matches: vec![anchor],
        }
    }

    pub fn accepts(&self, offset: f64, window: f64) -> bool {
        (offset - self.offset).abs() <= window
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Best fusion score among the bucket's members.
    pub fn best_score(&self) -> f64 {
        self.matches.iter().map(|c| c.score).fold(0.0, f64::max)
    }
}
