//! MatchingEngine: algorithm dispatch and scene/video aggregation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use argus_core::config::MatchingConfig;
use argus_core::constants::EXACT_HASH_EPSILON;
use argus_core::errors::{ArgusError, ArgusResult, StoreError};
use argus_core::features::{FeatureType, SceneFeatures};
use argus_core::models::MatchResult;
use argus_query::VectorQueryEngine;

/// The matching algorithms callers can request.
///
/// `Ensemble` is not mutually exclusive with the rest: it runs every
/// algorithm applicable to the available features and merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchAlgorithm {
    ExactHash,
    HammingDistance,
    CosineSimilarity,
    /// Cross-scene offset consistency; applied by the pipeline's
    /// consolidation stage, a no-op at segment level.
    TemporalAlignment,
    Ensemble,
}

impl MatchAlgorithm {
    pub fn label(self) -> &'static str {
        match self {
            MatchAlgorithm::ExactHash => "exact_hash",
            MatchAlgorithm::HammingDistance => "hamming_distance",
            MatchAlgorithm::CosineSimilarity => "cosine_similarity",
            MatchAlgorithm::TemporalAlignment => "temporal_alignment",
            MatchAlgorithm::Ensemble => "ensemble",
        }
    }
}

/// Scene- and video-level matcher over the query engine.
pub struct MatchingEngine {
    query: Arc<VectorQueryEngine>,
    config: MatchingConfig,
}

impl MatchingEngine {
    pub fn new(query: Arc<VectorQueryEngine>, config: MatchingConfig) -> Self {
        Self { query, config }
    }

    /// Match a sequence of perceptual hashes against the corpus.
    ///
    /// Each hash queries the hash collection; raw distance maps to
    /// confidence `1 - min(distance, 1)`, deduplicated per content id
    /// keeping the maximum.
    pub fn match_hash_sequence(
        &self,
        hashes: &[Vec<f32>],
        top_k: usize,
    ) -> ArgusResult<Vec<MatchResult>> {
        let mut best: HashMap<String, MatchResult> = HashMap::new();
        for hash in hashes {
            let results = match self.tolerate_unindexed(
                self.query
                    .query_by_feature(FeatureType::PerceptualHash, hash, top_k, None),
            )? {
                Some(results) => results,
                None => continue,
            };
            for hit in results {
                let confidence = (1.0 - f64::from(hit.distance).min(1.0)).max(0.0);
                if confidence < self.config.min_confidence {
                    continue;
                }
                let mut result = MatchResult::new(
                    hit.content_id(),
                    confidence,
                    MatchAlgorithm::HammingDistance.label(),
                );
                if let Some(ts) = hit.timestamp() {
                    result = result.with_timestamp(ts);
                }
                keep_max(&mut best, result);
            }
        }
        Ok(rank(best, top_k))
    }

    /// Match one CNN embedding against the corpus.
    pub fn match_cnn_features(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> ArgusResult<Vec<MatchResult>> {
        let mut best: HashMap<String, MatchResult> = HashMap::new();
        let results = match self.tolerate_unindexed(self.query.query_by_feature(
            FeatureType::Cnn,
            vector,
            top_k,
            None,
        ))? {
            Some(results) => results,
            None => return Ok(Vec::new()),
        };
        for hit in results {
            let confidence = (1.0 - f64::from(hit.distance).min(1.0)).max(0.0);
            if confidence < self.config.min_confidence {
                continue;
            }
            let mut result = MatchResult::new(
                hit.content_id(),
                confidence,
                MatchAlgorithm::CosineSimilarity.label(),
            );
            if let Some(ts) = hit.timestamp() {
                result = result.with_timestamp(ts);
            }
            keep_max(&mut best, result);
        }
        Ok(rank(best, top_k))
    }

    /// Exact-hash lookup: only hits at effectively zero distance count,
    /// and they count with full confidence.
    pub fn match_exact_hash(&self, hash: &[f32], top_k: usize) -> ArgusResult<Vec<MatchResult>> {
        let mut best: HashMap<String, MatchResult> = HashMap::new();
        let results = match self.tolerate_unindexed(self.query.query_by_feature(
            FeatureType::PerceptualHash,
            hash,
            top_k,
            None,
        ))? {
            Some(results) => results,
            None => return Ok(Vec::new()),
        };
        for hit in results {
            if hit.distance > EXACT_HASH_EPSILON {
                continue;
            }
            let mut result =
                MatchResult::new(hit.content_id(), 1.0, MatchAlgorithm::ExactHash.label());
            if let Some(ts) = hit.timestamp() {
                result = result.with_timestamp(ts);
            }
            keep_max(&mut best, result);
        }
        Ok(rank(best, top_k))
    }

    /// Match one video segment with every applicable algorithm, merging
    /// by content id (maximum confidence wins).
    pub fn match_video_segment(
        &self,
        features: &BTreeMap<FeatureType, Vec<f32>>,
        algorithms: &[MatchAlgorithm],
        top_k: usize,
    ) -> ArgusResult<Vec<MatchResult>> {
        let ensemble = algorithms.is_empty() || algorithms.contains(&MatchAlgorithm::Ensemble);
        let wants =
            |a: MatchAlgorithm| -> bool { ensemble || algorithms.contains(&a) };

        let mut best: HashMap<String, MatchResult> = HashMap::new();

        if let Some(hash) = features.get(&FeatureType::PerceptualHash) {
            if wants(MatchAlgorithm::ExactHash) {
                for result in self.match_exact_hash(hash, top_k)? {
                    keep_max(&mut best, result);
                }
            }
            if wants(MatchAlgorithm::HammingDistance) {
                for result in self.match_hash_sequence(std::slice::from_ref(hash), top_k)? {
                    keep_max(&mut best, result);
                }
            }
        }
        if let Some(cnn) = features.get(&FeatureType::Cnn) {
            if wants(MatchAlgorithm::CosineSimilarity) {
                for result in self.match_cnn_features(cnn, top_k)? {
                    keep_max(&mut best, result);
                }
            }
        }

        let ranked = rank(best, top_k);
        debug!(
            modalities = features.len(),
            matches = ranked.len(),
            "segment matching complete"
        );
        Ok(ranked)
    }

    /// Match a whole video: per-scene segment matching, then cross-scene
    /// aggregation by content id.
    ///
    /// Aggregated confidence is the mean of per-scene confidences;
    /// `match_type` records how many scenes agreed.
    pub fn match_video(
        &self,
        scenes: &[SceneFeatures],
        algorithms: &[MatchAlgorithm],
        top_k: usize,
    ) -> ArgusResult<Vec<MatchResult>> {
        struct SceneEvidence {
            confidences: Vec<f64>,
            first_timestamp: Option<f64>,
        }

        let mut evidence: HashMap<String, SceneEvidence> = HashMap::new();
        for scene in scenes {
            let scene_results = self.match_video_segment(&scene.features, algorithms, top_k)?;
            for result in scene_results {
                let entry = evidence
                    .entry(result.content_id.clone())
                    .or_insert_with(|| SceneEvidence {
                        confidences: Vec::new(),
                        first_timestamp: None,
                    });
                entry.confidences.push(result.confidence);
                if entry.first_timestamp.is_none() {
                    // Tag with the query scene's start time.
                    entry.first_timestamp = Some(scene.start_time);
                }
            }
        }

        let mut aggregated: Vec<MatchResult> = evidence
            .into_iter()
            .map(|(content_id, ev)| {
                let matching_scenes = ev.confidences.len();
                let mean =
                    ev.confidences.iter().sum::<f64>() / matching_scenes.max(1) as f64;
                let mut result = MatchResult::new(
                    content_id,
                    mean,
                    format!("ensemble_{matching_scenes}_scenes"),
                )
                .with_metadata(serde_json::json!({
                    "matched_scenes": matching_scenes,
                    "total_scenes": scenes.len(),
                }));
                if let Some(ts) = ev.first_timestamp {
                    result = result.with_timestamp(ts);
                }
                result
            })
            .collect();

        aggregated.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        aggregated.truncate(top_k);

        info!(
            scenes = scenes.len(),
            matches = aggregated.len(),
            "video matching complete"
        );
        Ok(aggregated)
    }

    /// A modality whose collection does not exist yet yields no matches
    /// instead of failing the segment.
    fn tolerate_unindexed(
        &self,
        result: ArgusResult<Vec<argus_core::models::SearchResult>>,
    ) -> ArgusResult<Option<Vec<argus_core::models::SearchResult>>> {
        match result {
            Ok(results) => Ok(Some(results)),
            Err(ArgusError::StoreError(StoreError::CollectionNotFound { name })) => {
                debug!(collection = %name, "collection not indexed, no matches");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Keep the higher-confidence result per content id.
fn keep_max(best: &mut HashMap<String, MatchResult>, result: MatchResult) {
    match best.get_mut(&result.content_id) {
        Some(existing) if existing.confidence >= result.confidence => {}
        Some(existing) => *existing = result,
        None => {
            best.insert(result.content_id.clone(), result);
        }
    }
}

/// Sort descending by confidence and truncate.
fn rank(best: HashMap<String, MatchResult>, top_k: usize) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = best.into_values().collect();
    results.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(top_k);
    results
}
