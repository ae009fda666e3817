//! Matching-engine integration against an in-memory store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use argus_core::config::{FallbackMode, MatchingConfig, QueryConfig};
use argus_core::features::{FeatureType, FeatureVector, SceneFeatures};
use argus_core::traits::IVectorStore;
use argus_matching::{MatchAlgorithm, MatchingEngine};
use argus_query::VectorQueryEngine;
use argus_store::{LocalStore, ResilientVectorStore, RetryPolicy};

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

fn hash_for(bit: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; FeatureType::PerceptualHash.dimension()];
    v[bit] = 1.0;
    v
}

fn cnn_base() -> Vec<f32> {
    vec![0.1f32; FeatureType::Cnn.dimension()]
}

/// CNN vector at a chosen euclidean distance from `cnn_base()`.
fn cnn_at_distance(d: f32) -> Vec<f32> {
    let mut v = cnn_base();
    v[0] += d;
    v
}

fn engine() -> (Arc<VectorQueryEngine>, MatchingEngine) {
    let query = Arc::new(VectorQueryEngine::new(
        in_memory_store(),
        QueryConfig::default(),
    ));
    let matching = MatchingEngine::new(query.clone(), MatchingConfig::default());
    (query, matching)
}

#[test]
fn hash_sequence_match_dedups_by_content_keeping_max() {
    let (query, matching) = engine();
    query
        .index_feature_vectors(&[
            FeatureVector::new("movie-1", FeatureType::PerceptualHash, hash_for(0))
                .with_timestamp(5.0),
            FeatureVector::new("movie-1", FeatureType::PerceptualHash, hash_for(1))
                .with_timestamp(9.0),
        ])
        .unwrap();

    // Two query hashes, both hitting movie-1 (one exact, one not).
    let results = matching
        .match_hash_sequence(&[hash_for(0), hash_for(0)], 5)
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content_id, "movie-1");
    assert!((results[0].confidence - 1.0).abs() < 1e-6);
}

#[test]
fn cnn_match_maps_distance_to_confidence() {
    let (query, matching) = engine();
    query
        .index_feature_vectors(&[FeatureVector::new("movie-1", FeatureType::Cnn, cnn_base())])
        .unwrap();

    let results = matching.match_cnn_features(&cnn_at_distance(0.5), 5).unwrap();
    assert_eq!(results.len(), 1);
    assert!((results[0].confidence - 0.5).abs() < 1e-4);
    assert_eq!(results[0].match_type, "cosine_similarity");
}

#[test]
fn distances_beyond_one_clamp_to_zero_confidence_and_filter_out() {
    let (query, matching) = engine();
    query
        .index_feature_vectors(&[FeatureVector::new("movie-1", FeatureType::Cnn, cnn_base())])
        .unwrap();

    // Distance 3.0 → confidence 0 → below min_confidence → dropped.
    let results = matching.match_cnn_features(&cnn_at_distance(3.0), 5).unwrap();
    assert!(results.is_empty());
}

#[test]
fn exact_hash_only_accepts_zero_distance() {
    let (query, matching) = engine();
    query
        .index_feature_vectors(&[FeatureVector::new(
            "movie-1",
            FeatureType::PerceptualHash,
            hash_for(0),
        )])
        .unwrap();

    let exact = matching.match_exact_hash(&hash_for(0), 5).unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].confidence, 1.0);
    assert_eq!(exact[0].match_type, "exact_hash");

    let near = matching.match_exact_hash(&hash_for(1), 5).unwrap();
    assert!(near.is_empty());
}

#[test]
fn segment_match_unions_algorithms_by_max_confidence() {
    let (query, matching) = engine();
    query
        .index_feature_vectors(&[
            FeatureVector::new("movie-1", FeatureType::PerceptualHash, hash_for(0)),
            FeatureVector::new("movie-1", FeatureType::Cnn, cnn_base()),
        ])
        .unwrap();

    let mut features = BTreeMap::new();
    features.insert(FeatureType::PerceptualHash, hash_for(0));
    // CNN evidence is weaker (confidence 0.6) than the exact hash (1.0).
    features.insert(FeatureType::Cnn, cnn_at_distance(0.4));

    let results = matching
        .match_video_segment(&features, &[MatchAlgorithm::Ensemble], 5)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content_id, "movie-1");
    assert!((results[0].confidence - 1.0).abs() < 1e-6);
}

#[test]
fn segment_match_respects_requested_algorithms() {
    let (query, matching) = engine();
    query
        .index_feature_vectors(&[
            FeatureVector::new("movie-1", FeatureType::PerceptualHash, hash_for(0)),
            FeatureVector::new("movie-1", FeatureType::Cnn, cnn_base()),
        ])
        .unwrap();

    let mut features = BTreeMap::new();
    features.insert(FeatureType::PerceptualHash, hash_for(0));
    features.insert(FeatureType::Cnn, cnn_at_distance(0.4));

    // Cosine only: the exact-hash confidence must not leak in.
    let results = matching
        .match_video_segment(&features, &[MatchAlgorithm::CosineSimilarity], 5)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!((results[0].confidence - 0.6).abs() < 1e-4);
    assert_eq!(results[0].match_type, "cosine_similarity");
}

#[test]
fn video_match_aggregates_scene_confidences_by_mean() {
    let (query, matching) = engine();
    query
        .index_feature_vectors(&[FeatureVector::new("movie-1", FeatureType::Cnn, cnn_base())])
        .unwrap();

    // Three scenes matching at confidence 1.0, 0.5, and 0.6.
    let scenes = vec![
        SceneFeatures::new(0.0, 4.0).with_feature(FeatureType::Cnn, cnn_base()),
        SceneFeatures::new(4.0, 8.0).with_feature(FeatureType::Cnn, cnn_at_distance(0.5)),
        SceneFeatures::new(8.0, 12.0).with_feature(FeatureType::Cnn, cnn_at_distance(0.4)),
    ];

    let results = matching
        .match_video(&scenes, &[MatchAlgorithm::Ensemble], 5)
        .unwrap();
    assert_eq!(results.len(), 1);
    let top = &results[0];
    assert_eq!(top.content_id, "movie-1");
    assert!((top.confidence - (1.0 + 0.5 + 0.6) / 3.0).abs() < 1e-4);
    assert_eq!(top.match_type, "ensemble_3_scenes");
    assert_eq!(top.additional_metadata["matched_scenes"], 3);
    assert_eq!(top.additional_metadata["total_scenes"], 3);
    // Tagged with the first matching scene's start time.
    assert_eq!(top.timestamp, Some(0.0));
}

#[test]
fn uniform_confidence_across_scenes_is_preserved_by_the_mean() {
    let (query, matching) = engine();
    query
        .index_feature_vectors(&[FeatureVector::new("movie-1", FeatureType::Cnn, cnn_base())])
        .unwrap();

    let scenes: Vec<SceneFeatures> = (0..4)
        .map(|i| {
            SceneFeatures::new(i as f64 * 3.0, (i + 1) as f64 * 3.0)
                .with_feature(FeatureType::Cnn, cnn_at_distance(0.25))
        })
        .collect();

    let results = matching
        .match_video(&scenes, &[MatchAlgorithm::Ensemble], 5)
        .unwrap();
    assert_eq!(results[0].match_type, "ensemble_4_scenes");
    assert!((results[0].confidence - 0.75).abs() < 1e-4);
}

#[test]
fn video_match_with_no_evidence_is_empty() {
    let (_query, matching) = engine();
    let scenes = vec![SceneFeatures::new(0.0, 3.0).with_feature(FeatureType::Cnn, cnn_base())];
    let results = matching
        .match_video(&scenes, &[MatchAlgorithm::Ensemble], 5)
        .unwrap();
    assert!(results.is_empty());
}
