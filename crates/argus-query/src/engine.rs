//! VectorQueryEngine: routed, cached, fused access to the vector store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use argus_core::config::QueryConfig;
use argus_core::constants::MAX_BATCH_SIZE;
use argus_core::errors::{ArgusError, ArgusResult, StoreError};
use argus_core::features::{FeatureType, FeatureVector};
use argus_core::models::{Candidate, SearchResult};
use argus_core::traits::{IVectorStore, SearchParams};

use crate::cache::QueryCache;
use crate::fusion;
use crate::routing::CollectionRouter;

/// Query-side facade over the vector store.
///
/// Routes each modality to its collection, memoizes single-feature
/// queries through the TTL cache, fuses multi-feature scenes, and chunks
/// batch queries to bound request size.
pub struct VectorQueryEngine {
    store: Arc<dyn IVectorStore>,
    cache: QueryCache,
    router: CollectionRouter,
    config: QueryConfig,
}

impl VectorQueryEngine {
    pub fn new(store: Arc<dyn IVectorStore>, config: QueryConfig) -> Self {
        let cache = QueryCache::new(
            config.cache_capacity,
            Duration::from_secs(config.cache_ttl_secs),
        );
        let router = CollectionRouter::new(config.collection_overrides.clone());
        Self {
            store,
            cache,
            router,
            config,
        }
    }

    /// Index typed feature vectors, one collection per modality.
    ///
    /// Owner id, timestamp, and segment id travel as metadata so search
    /// hits can be mapped back to content. Returns ids in input order.
    pub fn index_feature_vectors(&self, vectors: &[FeatureVector]) -> ArgusResult<Vec<String>> {
        for v in vectors {
            v.validate()?;
        }

        let mut by_type: BTreeMap<FeatureType, Vec<usize>> = BTreeMap::new();
        for (idx, v) in vectors.iter().enumerate() {
            by_type.entry(v.feature_type).or_default().push(idx);
        }

        let mut assigned: Vec<String> = vec![String::new(); vectors.len()];
        for (feature_type, indices) in by_type {
            let collection = self.router.collection_for(feature_type);
            let batch: Vec<Vec<f32>> = indices.iter().map(|&i| vectors[i].values.clone()).collect();
            let metadata: Vec<serde_json::Value> = indices
                .iter()
                .map(|&i| {
                    let v = &vectors[i];
                    serde_json::json!({
                        "content_id": v.owner_id,
                        "timestamp": v.timestamp,
                        "segment_id": v.segment_id,
                    })
                })
                .collect();

            let ids = self
                .store
                .insert(collection, &batch, None, Some(&metadata))?;
            for (slot, id) in indices.into_iter().zip(ids) {
                assigned[slot] = id;
            }
        }
        Ok(assigned)
    }

    /// Single-feature similarity query, cache first.
    pub fn query_by_feature(
        &self,
        feature_type: FeatureType,
        vector: &[f32],
        top_k: usize,
        filter: Option<&serde_json::Value>,
    ) -> ArgusResult<Vec<SearchResult>> {
        let expected = feature_type.dimension();
        if vector.len() != expected {
            return Err(StoreError::DimensionMismatch {
                collection: self.router.collection_for(feature_type).to_string(),
                expected,
                actual: vector.len(),
            }
            .into());
        }

        let key = QueryCache::key(feature_type, vector, top_k, filter);
        if let Some(hit) = self.cache.get(&key) {
            debug!(%feature_type, top_k, "query cache hit");
            return Ok(hit);
        }

        let collection = self.router.collection_for(feature_type);
        let params = SearchParams {
            filter: filter.cloned(),
        };
        let mut result_lists = self
            .store
            .search(collection, &[vector.to_vec()], top_k, &params)?;
        let results = result_lists.pop().unwrap_or_default();

        self.cache.set(key, results.clone());
        Ok(results)
    }

    /// Query every modality present in a scene and fuse the results.
    ///
    /// Each modality is oversampled (`top_k * oversample_factor`) so
    /// fusion sees enough of each list to reward multi-signal content.
    /// A modality whose collection does not exist yet contributes
    /// nothing; other errors abort the scene.
    pub fn find_scene_matches(
        &self,
        features: &BTreeMap<FeatureType, Vec<f32>>,
        scene_index: usize,
        query_timestamp: f64,
        top_k: usize,
    ) -> ArgusResult<Vec<Candidate>> {
        let oversampled_k = top_k * self.config.oversample_factor.max(1);
        let mut results_by_type: Vec<(FeatureType, Vec<SearchResult>)> = Vec::new();

        for (feature_type, vector) in features {
            match self.query_by_feature(*feature_type, vector, oversampled_k, None) {
                Ok(results) => results_by_type.push((*feature_type, results)),
                Err(ArgusError::StoreError(StoreError::CollectionNotFound { name })) => {
                    debug!(
                        %feature_type,
                        collection = %name,
                        "modality not indexed yet, skipping"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let candidates =
            fusion::fuse_scene_results(&results_by_type, scene_index, query_timestamp, top_k);
        debug!(
            scene_index,
            modalities = results_by_type.len(),
            candidates = candidates.len(),
            "scene fusion complete"
        );
        Ok(candidates)
    }

    /// Batch query with chunking. A failed chunk is logged and yields
    /// empty result slots instead of aborting the whole batch.
    pub fn batch_query_by_features(
        &self,
        feature_type: FeatureType,
        vectors: &[Vec<f32>],
        top_k: usize,
    ) -> ArgusResult<Vec<Vec<SearchResult>>> {
        let collection = self.router.collection_for(feature_type);
        let chunk_size = self.config.batch_size.clamp(1, MAX_BATCH_SIZE);
        let mut all_results: Vec<Vec<SearchResult>> = Vec::with_capacity(vectors.len());

        for (chunk_index, chunk) in vectors.chunks(chunk_size).enumerate() {
            match self
                .store
                .search(collection, chunk, top_k, &SearchParams::default())
            {
                Ok(results) => all_results.extend(results),
                Err(e) => {
                    warn!(
                        %feature_type,
                        chunk_index,
                        chunk_len = chunk.len(),
                        error = %e,
                        "batch chunk failed, substituting empty results"
                    );
                    all_results.extend(std::iter::repeat_with(Vec::new).take(chunk.len()));
                }
            }
        }
        Ok(all_results)
    }

    /// Cache entry count, for observability.
    pub fn cached_queries(&self) -> u64 {
        self.cache.entry_count()
    }
}
