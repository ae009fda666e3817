//! Weighted multi-feature fusion: per-modality result lists collapse
//! into one ranked candidate list per scene.
//!
//! Each content id accumulates `weight(type) * score(hit)` across every
//! modality that surfaced it; evidence breadth is kept alongside the
//! score so later stages can distinguish one-signal from multi-signal
//! candidates.

use std::collections::HashMap;

use argus_core::features::FeatureType;
use argus_core::models::{Candidate, SearchResult};

/// Running fusion state for one content id.
struct Accumulator {
    score: f64,
    types: std::collections::BTreeSet<FeatureType>,
    /// Target timestamp of the strongest single contribution.
    best_contribution: f64,
    target_timestamp: Option<f64>,
}

/// Fuse per-modality result lists into ranked candidates.
///
/// `scene_index`/`query_timestamp` tag every candidate with the query
/// scene that produced it. Output is sorted descending by fused score
/// and truncated to `top_k`.
pub fn fuse_scene_results(
    results_by_type: &[(FeatureType, Vec<SearchResult>)],
    scene_index: usize,
    query_timestamp: f64,
    top_k: usize,
) -> Vec<Candidate> {
    let mut accumulators: HashMap<String, Accumulator> = HashMap::new();

    for (feature_type, results) in results_by_type {
        let weight = feature_type.fusion_weight();
        for hit in results {
            let contribution = weight * hit.score();
            let entry = accumulators
                .entry(hit.content_id().to_string())
                .or_insert_with(|| Accumulator {
                    score: 0.0,
                    types: std::collections::BTreeSet::new(),
                    best_contribution: 0.0,
                    target_timestamp: None,
                });
            entry.score += contribution;
            entry.types.insert(*feature_type);
            if contribution > entry.best_contribution {
                entry.best_contribution = contribution;
                entry.target_timestamp = hit.timestamp();
            }
        }
    }

    let mut candidates: Vec<Candidate> = accumulators
        .into_iter()
        .map(|(content_id, acc)| Candidate {
            content_id,
            score: acc.score,
            matched_feature_types: acc.types,
            query_scene_index: scene_index,
            query_timestamp,
            target_timestamp: acc.target_timestamp,
        })
        .collect();

    // Sort by fused score descending.
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(top_k);
    candidates
}
