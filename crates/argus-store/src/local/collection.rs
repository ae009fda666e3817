//! One in-memory fallback collection with brute-force exact search.
//!
//! This is also the persisted record layout: the whole struct serializes
//! to one JSON document per collection.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use argus_core::constants::PARALLEL_SCAN_THRESHOLD;
use argus_core::errors::{ArgusResult, StoreError};
use argus_core::models::{DistanceMetric, SearchResult};
use argus_core::traits::SearchParams;

/// A fixed-dimension set of vectors with parallel arrays for ids and
/// metadata. All three stay index-aligned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackCollection {
    pub dimension: usize,
    pub metric: DistanceMetric,
    pub vectors: Vec<Vec<f32>>,
    pub ids: Vec<String>,
    pub metadata: Vec<serde_json::Value>,
}

impl FallbackCollection {
    pub fn new(dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            dimension,
            metric,
            vectors: Vec::new(),
            ids: Vec::new(),
            metadata: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append a batch. All-or-nothing: dimensions are validated up front
    /// so a rejected batch leaves the collection unchanged.
    pub fn insert(
        &mut self,
        name: &str,
        vectors: &[Vec<f32>],
        ids: Option<&[String]>,
        metadata: Option<&[serde_json::Value]>,
    ) -> ArgusResult<Vec<String>> {
        for v in vectors {
            if v.len() != self.dimension {
                return Err(StoreError::DimensionMismatch {
                    collection: name.to_string(),
                    expected: self.dimension,
                    actual: v.len(),
                }
                .into());
            }
        }
        if let Some(ids) = ids {
            if ids.len() != vectors.len() {
                return Err(StoreError::RequestFailed {
                    operation: "insert".to_string(),
                    reason: format!("{} ids for {} vectors", ids.len(), vectors.len()),
                }
                .into());
            }
        }
        if let Some(meta) = metadata {
            if meta.len() != vectors.len() {
                return Err(StoreError::RequestFailed {
                    operation: "insert".to_string(),
                    reason: format!("{} metadata entries for {} vectors", meta.len(), vectors.len()),
                }
                .into());
            }
        }

        let assigned: Vec<String> = match ids {
            Some(ids) => ids.to_vec(),
            None => vectors
                .iter()
                .map(|_| uuid::Uuid::new_v4().to_string())
                .collect(),
        };

        self.vectors.extend_from_slice(vectors);
        self.ids.extend(assigned.iter().cloned());
        match metadata {
            Some(meta) => self.metadata.extend(meta.iter().cloned()),
            None => self
                .metadata
                .extend(vectors.iter().map(|_| serde_json::Value::Null)),
        }

        Ok(assigned)
    }

    /// Brute-force exact search: scan every vector, sort ascending by
    /// distance, truncate to `top_k`. Scans go parallel once the
    /// collection is large enough to amortize the fork.
    pub fn search(
        &self,
        name: &str,
        query: &[f32],
        top_k: usize,
        params: &SearchParams,
    ) -> ArgusResult<Vec<SearchResult>> {
        if query.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                collection: name.to_string(),
                expected: self.dimension,
                actual: query.len(),
            }
            .into());
        }

        let scan = |(idx, vector): (usize, &Vec<f32>)| -> Option<(usize, f32)> {
            if !matches_filter(&self.metadata[idx], params.filter.as_ref()) {
                return None;
            }
            Some((idx, distance(self.metric, query, vector)))
        };

        let mut scored: Vec<(usize, f32)> = if self.vectors.len() >= PARALLEL_SCAN_THRESHOLD {
            self.vectors.par_iter().enumerate().filter_map(scan).collect()
        } else {
            self.vectors.iter().enumerate().filter_map(scan).collect()
        };

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(idx, dist)| {
                SearchResult::new(self.ids[idx].clone(), dist)
                    .with_metadata(self.metadata[idx].clone())
            })
            .collect())
    }
}

/// Equality filter: every key in the filter object must be present and
/// equal in the entry's metadata.
fn matches_filter(metadata: &serde_json::Value, filter: Option<&serde_json::Value>) -> bool {
    let Some(serde_json::Value::Object(wanted)) = filter else {
        return true;
    };
    let Some(actual) = metadata.as_object() else {
        return wanted.is_empty();
    };
    wanted.iter().all(|(k, v)| actual.get(k) == Some(v))
}

fn distance(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        DistanceMetric::Euclidean => {
            let sum: f64 = a
                .iter()
                .zip(b)
                .map(|(x, y)| (f64::from(*x) - f64::from(*y)).powi(2))
                .sum();
            sum.sqrt() as f32
        }
        DistanceMetric::Cosine => (1.0 - cosine_similarity(a, b)) as f32,
        // Negated so that "smaller distance = closer" holds for dot products.
        DistanceMetric::InnerProduct => {
            let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
            (-dot) as f32
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
