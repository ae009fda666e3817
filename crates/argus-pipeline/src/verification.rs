//! Detailed verification under a fixed concurrency bound.
//!
//! Each surviving candidate gets one verification task: re-match the
//! scene that carried its strongest evidence, blend the result into the
//! final confidence, and attach enrichment metadata. A fixed-size
//! semaphore caps backend load; the request deadline aborts whatever is
//! still outstanding and keeps the finished results.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

use argus_core::features::SceneFeatures;
use argus_core::models::MatchResult;
use argus_core::traits::IMetadataEnricher;
use argus_matching::{MatchAlgorithm, MatchingEngine};

use crate::consolidation::ConsolidatedCandidate;

/// Output of the verification stage.
pub struct VerificationOutcome {
    /// Sorted descending by confidence.
    pub results: Vec<MatchResult>,
    /// Whether the deadline cut verification short.
    pub timed_out: bool,
}

/// Verify candidates concurrently, bounded by `concurrency` workers,
/// aborting at `deadline`.
#[allow(clippy::too_many_arguments)]
pub async fn run_detailed_verification(
    candidates: Vec<ConsolidatedCandidate>,
    scenes: Arc<Vec<SceneFeatures>>,
    matching: Arc<MatchingEngine>,
    enricher: Option<Arc<dyn IMetadataEnricher>>,
    algorithms: Vec<MatchAlgorithm>,
    concurrency: usize,
    verification_top_k: usize,
    deadline: Instant,
) -> VerificationOutcome {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks: JoinSet<Option<MatchResult>> = JoinSet::new();

    for candidate in candidates {
        let semaphore = semaphore.clone();
        let scenes = scenes.clone();
        let matching = matching.clone();
        let enricher = enricher.clone();
        let algorithms = algorithms.clone();
        tasks.spawn(async move {
            // Abort point for cancelled tasks still waiting on a permit.
            let _permit = semaphore.acquire_owned().await.ok()?;
            tokio::task::spawn_blocking(move || {
                verify_candidate(
                    &candidate,
                    &scenes,
                    &matching,
                    enricher.as_deref(),
                    &algorithms,
                    verification_top_k,
                )
            })
            .await
            .ok()
        });
    }

    let mut results: Vec<MatchResult> = Vec::new();
    let mut timed_out = false;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match tokio::time::timeout(remaining, tasks.join_next()).await {
            Ok(Some(Ok(Some(result)))) => results.push(result),
            Ok(Some(Ok(None))) => {}
            Ok(Some(Err(join_err))) => {
                if !join_err.is_cancelled() {
                    warn!(error = %join_err, "verification task panicked");
                }
            }
            Ok(None) => break,
            Err(_) => {
                timed_out = true;
                tasks.abort_all();
                // Collect whatever had already finished before the cut.
                while let Some(done) = tasks.join_next().await {
                    if let Ok(Some(result)) = done {
                        results.push(result);
                    }
                }
                warn!(
                    completed = results.len(),
                    "verification deadline exceeded, returning partial results"
                );
                break;
            }
        }
    }

    results.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    VerificationOutcome { results, timed_out }
}

/// Verify one candidate. Never fails: verification shortfalls lower
/// confidence instead of dropping the candidate.
fn verify_candidate(
    candidate: &ConsolidatedCandidate,
    scenes: &[SceneFeatures],
    matching: &MatchingEngine,
    enricher: Option<&dyn IMetadataEnricher>,
    algorithms: &[MatchAlgorithm],
    verification_top_k: usize,
) -> MatchResult {
    let retrieval_confidence = candidate.score.min(1.0);

    // Re-run detailed matching on the scene with the strongest evidence
    // and look for this content among its matches.
    let verified = scenes
        .get(candidate.best_scene_index)
        .and_then(|scene| {
            matching
                .match_video_segment(&scene.features, algorithms, verification_top_k)
                .map_err(|e| {
                    warn!(
                        content_id = %candidate.content_id,
                        error = %e,
                        "detailed matching failed during verification"
                    );
                    e
                })
                .ok()
        })
        .and_then(|results| {
            results
                .into_iter()
                .find(|r| r.content_id == candidate.content_id)
        });

    let (confidence, verified_type) = match &verified {
        Some(v) => ((retrieval_confidence + v.confidence) / 2.0, Some(v.match_type.clone())),
        // Unconfirmed candidates keep only damped retrieval evidence.
        None => (retrieval_confidence * 0.5, None),
    };

    let match_type = if candidate.aligned_scenes >= 2 {
        format!("temporal_alignment_{}_scenes", candidate.aligned_scenes)
    } else {
        verified_type.unwrap_or_else(|| "scene_match".to_string())
    };

    let types: Vec<&str> = candidate
        .matched_feature_types
        .iter()
        .map(|t| t.label())
        .collect();
    let mut result = MatchResult::new(&candidate.content_id, confidence, match_type)
        .with_metadata(serde_json::json!({
            "aligned_scenes": candidate.aligned_scenes,
            "supporting_candidates": candidate.supporting_candidates,
            "matched_feature_types": types,
            "fusion_score": candidate.score,
        }));
    if let Some(ts) = candidate.target_timestamp {
        result = result.with_timestamp(ts);
    }

    if let Some(enricher) = enricher {
        match enricher.enrich(&candidate.content_id) {
            Ok(extra) => result.merge_metadata(&extra),
            Err(e) => {
                debug!(
                    content_id = %candidate.content_id,
                    error = %e,
                    "enrichment unavailable, keeping base metadata"
                );
            }
        }
    }

    result
}
