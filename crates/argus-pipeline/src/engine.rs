//! QueryProcessingEngine: the five-stage identification pipeline.
//!
//! Stage 1: Preprocess → Stage 2: Extract → Stage 3: Retrieve →
//! Stage 4: Consolidate → Stage 5: Detailed verification.
//!
//! Stages run sequentially per request and each records its elapsed
//! time. Any stage error is terminal: the response carries
//! `status = failed` plus whatever metrics were gathered, never
//! partial matches from a broken run. Retries belong to the store.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use argus_core::config::PipelineConfig;
use argus_core::errors::{ArgusResult, PipelineError};
use argus_core::features::SceneFeatures;
use argus_core::models::{Candidate, MatchResult, QueryMetrics, QueryResponse};
use argus_core::traits::{IFeatureExtractor, IMetadataEnricher};
use argus_matching::{MatchAlgorithm, MatchingEngine};
use argus_query::VectorQueryEngine;

use crate::consolidation;
use crate::sampling;
use crate::verification;

/// Orchestrates one identification query end to end.
pub struct QueryProcessingEngine {
    extractor: Arc<dyn IFeatureExtractor>,
    enricher: Option<Arc<dyn IMetadataEnricher>>,
    query: Arc<VectorQueryEngine>,
    matching: Arc<MatchingEngine>,
    config: PipelineConfig,
}

impl QueryProcessingEngine {
    pub fn new(
        extractor: Arc<dyn IFeatureExtractor>,
        query: Arc<VectorQueryEngine>,
        matching: Arc<MatchingEngine>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            enricher: None,
            query,
            matching,
            config,
        }
    }

    /// Attach an optional metadata enricher consulted during verification.
    pub fn with_enricher(mut self, enricher: Arc<dyn IMetadataEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Process one query. Never returns `Err`: failures become a
    /// terminal `failed` response carrying the metrics gathered so far.
    pub async fn process_query(
        &self,
        source: &str,
        algorithms: &[MatchAlgorithm],
        max_results: usize,
    ) -> QueryResponse {
        let query_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let mut metrics = QueryMetrics::default();

        info!(query_id = %query_id, source, "processing identification query");

        let outcome = self
            .run_stages(source, algorithms, max_results, started, &mut metrics)
            .await;
        metrics.total_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok((results, timed_out)) => {
                info!(
                    query_id = %query_id,
                    results = results.len(),
                    timed_out,
                    total_ms = metrics.total_ms,
                    "query complete"
                );
                if timed_out {
                    QueryResponse::partial(query_id, results, metrics)
                } else {
                    QueryResponse::completed(query_id, results, metrics)
                }
            }
            Err(e) => {
                error!(query_id = %query_id, error = %e, "query failed");
                QueryResponse::failed(query_id, metrics, e.to_string())
            }
        }
    }

    async fn run_stages(
        &self,
        source: &str,
        algorithms: &[MatchAlgorithm],
        max_results: usize,
        started: Instant,
        metrics: &mut QueryMetrics,
    ) -> ArgusResult<(Vec<MatchResult>, bool)> {
        let deadline = started + Duration::from_millis(self.config.query_deadline_ms);

        // Stage 1: Preprocess (external boundary).
        let stage_start = Instant::now();
        let handle = {
            let extractor = self.extractor.clone();
            let source = source.to_string();
            tokio::task::spawn_blocking(move || extractor.preprocess(&source))
                .await
                .map_err(|e| PipelineError::PreprocessFailed {
                    reason: e.to_string(),
                })??
        };
        metrics.preprocess_ms = stage_start.elapsed().as_millis() as u64;
        debug!(media_id = %handle.id, "Stage 1: preprocessing complete");

        // Stage 2: Extract features (external boundary).
        let stage_start = Instant::now();
        let scenes: Vec<SceneFeatures> = {
            let extractor = self.extractor.clone();
            let handle = handle.clone();
            tokio::task::spawn_blocking(move || extractor.extract(&handle))
                .await
                .map_err(|e| PipelineError::ExtractionFailed {
                    reason: e.to_string(),
                })??
        };
        metrics.extract_ms = stage_start.elapsed().as_millis() as u64;
        metrics.scenes_total = scenes.len();
        info!(scenes = scenes.len(), "Stage 2: feature extraction complete");

        if scenes.is_empty() {
            return Ok((Vec::new(), false));
        }

        // Stage 3: Retrieve candidates from sampled scenes.
        let stage_start = Instant::now();
        let sampled = sampling::sample_scene_indices(
            &scenes,
            self.config.max_scenes_per_query,
            self.config.sampling_strategy,
        );
        metrics.scenes_sampled = sampled.len();

        let candidates = self.retrieve_candidates(&scenes, &sampled).await;
        metrics.retrieve_ms = stage_start.elapsed().as_millis() as u64;
        metrics.candidates_retrieved = candidates.len();
        info!(
            sampled = sampled.len(),
            candidates = candidates.len(),
            "Stage 3: candidate retrieval complete"
        );

        // Stage 4: Consolidate by temporal-offset alignment.
        let stage_start = Instant::now();
        let consolidated = consolidation::consolidate(
            candidates,
            self.config.temporal_alignment,
            self.config.alignment_window_secs,
        );
        metrics.consolidate_ms = stage_start.elapsed().as_millis() as u64;
        metrics.candidates_consolidated = consolidated.len();
        info!(
            consolidated = consolidated.len(),
            "Stage 4: consolidation complete"
        );

        // Stage 5: Detailed verification under the concurrency bound.
        let stage_start = Instant::now();
        let outcome = verification::run_detailed_verification(
            consolidated,
            Arc::new(scenes),
            self.matching.clone(),
            self.enricher.clone(),
            algorithms.to_vec(),
            self.config.verification_concurrency,
            self.config.verification_top_k,
            deadline,
        )
        .await;
        metrics.verify_ms = stage_start.elapsed().as_millis() as u64;
        info!(
            verified = outcome.results.len(),
            timed_out = outcome.timed_out,
            "Stage 5: detailed verification complete"
        );

        let mut results = outcome.results;
        results.truncate(max_results);
        Ok((results, outcome.timed_out))
    }

    /// Per-scene retrieval. Scenes are independent until the merge, so
    /// they run concurrently; a failed scene is logged and contributes
    /// zero candidates rather than failing the query.
    async fn retrieve_candidates(
        &self,
        scenes: &[SceneFeatures],
        sampled: &[usize],
    ) -> Vec<Candidate> {
        let prefetch = self.config.prefetch_candidates;
        let mut tasks: JoinSet<(usize, ArgusResult<Vec<Candidate>>)> = JoinSet::new();
        for &scene_index in sampled {
            let query = self.query.clone();
            let scene = scenes[scene_index].clone();
            tasks.spawn_blocking(move || {
                let matches = query.find_scene_matches(
                    &scene.features,
                    scene_index,
                    scene.start_time,
                    prefetch,
                );
                (scene_index, matches)
            });
        }

        let mut per_scene: Vec<(usize, Vec<Candidate>)> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((scene_index, Ok(candidates))) => per_scene.push((scene_index, candidates)),
                Ok((scene_index, Err(e))) => {
                    warn!(
                        scene_index,
                        error = %e,
                        "scene retrieval failed, contributing zero candidates"
                    );
                }
                Err(join_err) => {
                    warn!(error = %join_err, "scene retrieval task panicked");
                }
            }
        }

        // Deterministic merge order regardless of completion order.
        per_scene.sort_by_key(|(scene_index, _)| *scene_index);
        per_scene
            .into_iter()
            .flat_map(|(_, candidates)| candidates)
            .collect()
    }
}
