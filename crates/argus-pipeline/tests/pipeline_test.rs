//! End-to-end pipeline tests: extraction through verification against
//! an in-memory store, with scripted external collaborators.

use std::sync::Arc;
use std::time::Duration;

use argus_core::config::{FallbackMode, MatchingConfig, PipelineConfig, QueryConfig};
use argus_core::errors::{ArgusResult, PipelineError};
use argus_core::features::{FeatureType, FeatureVector, MediaHandle, MediaKind, SceneFeatures};
use argus_core::models::QueryStatus;
use argus_core::traits::{IFeatureExtractor, IMetadataEnricher, IVectorStore};
use argus_matching::{MatchAlgorithm, MatchingEngine};
use argus_pipeline::QueryProcessingEngine;
use argus_query::VectorQueryEngine;
use argus_store::{LocalStore, ResilientVectorStore, RetryPolicy};

// ── Scripted collaborators ────────────────────────────────────────────

struct StaticExtractor {
    scenes: Vec<SceneFeatures>,
}

impl IFeatureExtractor for StaticExtractor {
    fn preprocess(&self, source: &str) -> ArgusResult<MediaHandle> {
        Ok(MediaHandle {
            id: format!("media-{source}"),
            source: source.to_string(),
            kind: MediaKind::Video,
            duration_secs: Some(60.0),
        })
    }
    fn extract(&self, _handle: &MediaHandle) -> ArgusResult<Vec<SceneFeatures>> {
        Ok(self.scenes.clone())
    }
}

struct FailingExtractor;

impl IFeatureExtractor for FailingExtractor {
    fn preprocess(&self, source: &str) -> ArgusResult<MediaHandle> {
        Ok(MediaHandle {
            id: format!("media-{source}"),
            source: source.to_string(),
            kind: MediaKind::Video,
            duration_secs: None,
        })
    }
    fn extract(&self, _handle: &MediaHandle) -> ArgusResult<Vec<SceneFeatures>> {
        Err(PipelineError::ExtractionFailed {
            reason: "unsupported codec".to_string(),
        }
        .into())
    }
}

struct TitleEnricher;

impl IMetadataEnricher for TitleEnricher {
    fn enrich(&self, content_id: &str) -> ArgusResult<serde_json::Value> {
        Ok(serde_json::json!({
            "title": format!("Title of {content_id}"),
            "year": 1982,
        }))
    }
}

/// Sleeps long enough on selected ids to trip the request deadline.
struct SlowEnricher;

impl IMetadataEnricher for SlowEnricher {
    fn enrich(&self, content_id: &str) -> ArgusResult<serde_json::Value> {
        if content_id.starts_with("slow") {
            std::thread::sleep(Duration::from_millis(1_000));
        }
        Ok(serde_json::json!({"title": content_id}))
    }
}

// ── Fixture helpers ───────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn in_memory_store() -> Arc<dyn IVectorStore> {
    let store = ResilientVectorStore::with_transport(
        None,
        LocalStore::in_memory(),
        FallbackMode::Always,
        RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        },
    );
    store.connect().unwrap();
    Arc::new(store)
}

/// A CNN unit vector with a single distinguishing component.
fn cnn_unit(component: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; FeatureType::Cnn.dimension()];
    v[component] = 1.0;
    v
}

struct Fixture {
    query: Arc<VectorQueryEngine>,
    matching: Arc<MatchingEngine>,
}

fn fixture() -> Fixture {
    init_tracing();
    let query = Arc::new(VectorQueryEngine::new(
        in_memory_store(),
        QueryConfig::default(),
    ));
    let matching = Arc::new(MatchingEngine::new(
        query.clone(),
        MatchingConfig::default(),
    ));
    Fixture { query, matching }
}

impl Fixture {
    /// Index `movie-1` CNN features at 10s, 14s, 18s.
    fn index_reference_movie(&self) {
        self.query
            .index_feature_vectors(&[
                FeatureVector::new("movie-1", FeatureType::Cnn, cnn_unit(0)).with_timestamp(10.0),
                FeatureVector::new("movie-1", FeatureType::Cnn, cnn_unit(1)).with_timestamp(14.0),
                FeatureVector::new("movie-1", FeatureType::Cnn, cnn_unit(2)).with_timestamp(18.0),
            ])
            .unwrap();
    }

    /// Three query scenes at 0s, 4s, 8s whose features match the
    /// reference movie at a consistent +10s offset.
    fn aligned_query_scenes(&self) -> Vec<SceneFeatures> {
        vec![
            SceneFeatures::new(0.0, 4.0).with_feature(FeatureType::Cnn, cnn_unit(0)),
            SceneFeatures::new(4.0, 8.0).with_feature(FeatureType::Cnn, cnn_unit(1)),
            SceneFeatures::new(8.0, 12.0).with_feature(FeatureType::Cnn, cnn_unit(2)),
        ]
    }

    fn engine_with(
        &self,
        extractor: Arc<dyn IFeatureExtractor>,
        config: PipelineConfig,
    ) -> QueryProcessingEngine {
        QueryProcessingEngine::new(extractor, self.query.clone(), self.matching.clone(), config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn aligned_query_identifies_content_with_temporal_boost() {
    let fx = fixture();
    fx.index_reference_movie();

    let extractor = Arc::new(StaticExtractor {
        scenes: fx.aligned_query_scenes(),
    });
    let engine = fx
        .engine_with(extractor, PipelineConfig::default())
        .with_enricher(Arc::new(TitleEnricher));

    let response = engine
        .process_query("query.mp4", &[MatchAlgorithm::Ensemble], 5)
        .await;

    assert_eq!(response.status, QueryStatus::Completed);
    assert!(response.error.is_none());
    assert!(!response.results.is_empty());

    let top = &response.results[0];
    assert_eq!(top.content_id, "movie-1");
    assert_eq!(top.match_type, "temporal_alignment_3_scenes");
    assert!(top.confidence > 0.9, "aligned match should be near-certain");
    assert_eq!(top.additional_metadata["aligned_scenes"], 3);
    assert_eq!(top.title, "Title of movie-1");
    assert_eq!(top.additional_metadata["year"], 1982);

    // Every stage reported volume and the totals are coherent.
    assert_eq!(response.metrics.scenes_total, 3);
    assert_eq!(response.metrics.scenes_sampled, 3);
    assert!(response.metrics.candidates_retrieved >= 1);
    assert_eq!(response.metrics.candidates_consolidated, 1);
}

#[tokio::test]
async fn extraction_failure_is_terminal_but_keeps_metrics() {
    let fx = fixture();
    let engine = fx.engine_with(Arc::new(FailingExtractor), PipelineConfig::default());

    let response = engine
        .process_query("broken.mp4", &[MatchAlgorithm::Ensemble], 5)
        .await;

    assert_eq!(response.status, QueryStatus::Failed);
    assert!(response.results.is_empty());
    let error = response.error.expect("failed response carries an error");
    assert!(error.contains("unsupported codec"));
    // Preprocessing completed before the failure, so its timing exists
    // and the response still reports totals.
    assert_eq!(response.metrics.scenes_total, 0);
}

#[tokio::test]
async fn empty_extraction_completes_with_no_results() {
    let fx = fixture();
    let engine = fx.engine_with(
        Arc::new(StaticExtractor { scenes: vec![] }),
        PipelineConfig::default(),
    );

    let response = engine
        .process_query("silent.mp4", &[MatchAlgorithm::Ensemble], 5)
        .await;
    assert_eq!(response.status, QueryStatus::Completed);
    assert!(response.results.is_empty());
    assert_eq!(response.metrics.scenes_total, 0);
}

#[tokio::test]
async fn verification_deadline_returns_partial_results() {
    let fx = fixture();
    // Two contents; the slow one's enrichment blocks past the deadline.
    fx.query
        .index_feature_vectors(&[
            FeatureVector::new("fast-movie", FeatureType::Cnn, cnn_unit(0)).with_timestamp(5.0),
            FeatureVector::new("slow-movie", FeatureType::Cnn, cnn_unit(1)).with_timestamp(9.0),
        ])
        .unwrap();

    let scenes = vec![
        SceneFeatures::new(0.0, 4.0).with_feature(FeatureType::Cnn, cnn_unit(0)),
        SceneFeatures::new(4.0, 8.0).with_feature(FeatureType::Cnn, cnn_unit(1)),
    ];
    let config = PipelineConfig {
        query_deadline_ms: 400,
        verification_concurrency: 2,
        ..Default::default()
    };
    let engine = fx
        .engine_with(Arc::new(StaticExtractor { scenes }), config)
        .with_enricher(Arc::new(SlowEnricher));

    let response = engine
        .process_query("query.mp4", &[MatchAlgorithm::Ensemble], 5)
        .await;

    assert_eq!(response.status, QueryStatus::PartialTimeout);
    // The fast candidate finished before the cut.
    assert!(response
        .results
        .iter()
        .any(|r| r.content_id == "fast-movie"));
    assert!(response
        .results
        .iter()
        .all(|r| r.content_id != "slow-movie"));
}

#[tokio::test]
async fn results_truncate_to_max_results() {
    let fx = fixture();
    fx.query
        .index_feature_vectors(&[
            FeatureVector::new("a", FeatureType::Cnn, cnn_unit(0)).with_timestamp(1.0),
            FeatureVector::new("b", FeatureType::Cnn, cnn_unit(1)).with_timestamp(2.0),
            FeatureVector::new("c", FeatureType::Cnn, cnn_unit(2)).with_timestamp(3.0),
        ])
        .unwrap();

    // One scene whose CNN vector is close to all three references.
    let mut shared = vec![0.0f32; FeatureType::Cnn.dimension()];
    shared[0] = 1.0;
    shared[1] = 0.4;
    shared[2] = 0.4;
    let scenes = vec![SceneFeatures::new(0.0, 4.0).with_feature(FeatureType::Cnn, shared)];

    let engine = fx.engine_with(
        Arc::new(StaticExtractor { scenes }),
        PipelineConfig::default(),
    );
    let response = engine
        .process_query("query.mp4", &[MatchAlgorithm::Ensemble], 2)
        .await;

    assert_eq!(response.status, QueryStatus::Completed);
    assert!(response.results.len() <= 2);
    assert!(response.metrics.candidates_consolidated >= 3);
}

#[tokio::test]
async fn alignment_disabled_still_identifies_content() {
    let fx = fixture();
    fx.index_reference_movie();

    let config = PipelineConfig {
        temporal_alignment: false,
        ..Default::default()
    };
    let engine = fx.engine_with(
        Arc::new(StaticExtractor {
            scenes: fx.aligned_query_scenes(),
        }),
        config,
    );

    let response = engine
        .process_query("query.mp4", &[MatchAlgorithm::Ensemble], 5)
        .await;
    assert_eq!(response.status, QueryStatus::Completed);
    let top = &response.results[0];
    assert_eq!(top.content_id, "movie-1");
    assert!(
        !top.match_type.starts_with("temporal_alignment"),
        "no boost without alignment"
    );
}

#[tokio::test]
async fn enrichment_failure_does_not_drop_matches() {
    struct BrokenEnricher;
    impl IMetadataEnricher for BrokenEnricher {
        fn enrich(&self, _content_id: &str) -> ArgusResult<serde_json::Value> {
            Err(argus_core::errors::QueryError::SearchFailed {
                reason: "metadata service down".to_string(),
            }
            .into())
        }
    }

    let fx = fixture();
    fx.index_reference_movie();
    let engine = fx
        .engine_with(
            Arc::new(StaticExtractor {
                scenes: fx.aligned_query_scenes(),
            }),
            PipelineConfig::default(),
        )
        .with_enricher(Arc::new(BrokenEnricher));

    let response = engine
        .process_query("query.mp4", &[MatchAlgorithm::Ensemble], 5)
        .await;
    assert_eq!(response.status, QueryStatus::Completed);
    assert_eq!(response.results[0].content_id, "movie-1");
    // Title falls back to the content id when enrichment is unavailable.
    assert_eq!(response.results[0].title, "movie-1");
}
