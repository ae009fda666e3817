//! Consolidation: merge per-scene candidates into one ranked entry per
//! content id, using temporal-offset alignment as corroborating evidence.
//!
//! Candidates of the same content whose `target - query` offsets agree
//! within the alignment window form a bucket; a bucket of two or more
//! scenes means the match occurs at a consistent relative position and
//! earns a confidence boost.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use argus_core::features::FeatureType;
use argus_core::models::{AlignmentGroup, Candidate};

/// Per-content evidence after consolidation.
#[derive(Debug, Clone)]
pub struct ConsolidatedCandidate {
    pub content_id: String,
    /// Fusion score, boosted when aligned.
    pub score: f64,
    pub matched_feature_types: BTreeSet<FeatureType>,
    /// Scenes in the winning alignment bucket (1 = no alignment).
    pub aligned_scenes: usize,
    /// All candidates observed for this content across scenes.
    pub supporting_candidates: usize,
    /// Scene that contributed the strongest evidence.
    pub best_scene_index: usize,
    pub target_timestamp: Option<f64>,
}

/// Consolidate raw per-scene candidates.
///
/// With alignment disabled this degenerates to keeping the max-score
/// candidate per content id.
pub fn consolidate(
    candidates: Vec<Candidate>,
    temporal_alignment: bool,
    window_secs: f64,
) -> Vec<ConsolidatedCandidate> {
    let mut by_content: HashMap<String, Vec<Candidate>> = HashMap::new();
    for candidate in candidates {
        by_content
            .entry(candidate.content_id.clone())
            .or_default()
            .push(candidate);
    }

    let mut consolidated: Vec<ConsolidatedCandidate> = by_content
        .into_iter()
        .map(|(content_id, group)| {
            if temporal_alignment {
                consolidate_aligned(content_id, group, window_secs)
            } else {
                best_unboosted(content_id, group)
            }
        })
        .collect();

    consolidated.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    consolidated
}

/// Alignment path for one content id.
fn consolidate_aligned(
    content_id: String,
    group: Vec<Candidate>,
    window_secs: f64,
) -> ConsolidatedCandidate {
    let total = group.len();

    // Bucket candidates with known offsets. Sorting first makes clusters
    // contiguous, so a single pass against each bucket anchor suffices.
    let mut alignable: Vec<&Candidate> = group.iter().filter(|c| c.offset().is_some()).collect();
    alignable.sort_by(|a, b| {
        a.offset()
            .partial_cmp(&b.offset())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut buckets: Vec<AlignmentGroup> = Vec::new();
    for candidate in alignable {
        let offset = candidate.offset().unwrap_or(0.0);
        match buckets.last_mut() {
            Some(bucket) if bucket.accepts(offset, window_secs) => {
                bucket.matches.push(candidate.clone());
            }
            _ => buckets.push(AlignmentGroup::new(candidate.clone())),
        }
    }

    let largest = buckets.into_iter().max_by_key(AlignmentGroup::len);
    match largest {
        Some(bucket) if bucket.len() >= 2 => {
            let aligned = bucket.len();
            let alignment_score = (aligned as f64 / total as f64).min(1.0);
            let best = bucket
                .matches
                .iter()
                .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
                .expect("bucket has at least two members");

            let mut types = BTreeSet::new();
            for member in &bucket.matches {
                types.extend(member.matched_feature_types.iter().copied());
            }

            debug!(
                content_id = %content_id,
                aligned,
                total,
                offset = bucket.offset,
                "alignment boost applied"
            );
            ConsolidatedCandidate {
                content_id,
                score: best.score * (1.0 + alignment_score),
                matched_feature_types: types,
                aligned_scenes: aligned,
                supporting_candidates: total,
                best_scene_index: best.query_scene_index,
                target_timestamp: best.target_timestamp,
            }
        }
        // No bucket reached two scenes: single-evidence candidates pass
        // through unboosted.
        _ => best_unboosted(content_id, group),
    }
}

/// Max-score candidate per content, no boost.
fn best_unboosted(content_id: String, group: Vec<Candidate>) -> ConsolidatedCandidate {
    let total = group.len();
    let best = group
        .into_iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
        .expect("content group is never empty");
    ConsolidatedCandidate {
        content_id,
        score: best.score,
        matched_feature_types: best.matched_feature_types,
        aligned_scenes: 1,
        supporting_candidates: total,
        best_scene_index: best.query_scene_index,
        target_timestamp: best.target_timestamp,
    }
}
