//! The local fallback store: concurrent collection map with one
//! serialized JSON record per collection under the fallback directory.

use std::path::PathBuf;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use argus_core::errors::{ArgusResult, StoreError};
use argus_core::models::{CollectionInfo, CollectionStats, DistanceMetric, SearchResult};
use argus_core::traits::{CreateCollectionOptions, IVectorTransport, SearchParams};

use super::collection::FallbackCollection;

/// In-memory vector store with optional disk persistence.
///
/// Collection mutation is serialized through the map's shard locks, so
/// concurrent callers never observe a half-applied batch. Persistence
/// happens after each mutating batch, not per vector.
pub struct LocalStore {
    collections: DashMap<String, FallbackCollection>,
    data_dir: Option<PathBuf>,
}

impl LocalStore {
    /// Purely in-memory store; nothing survives the process.
    pub fn in_memory() -> Self {
        Self {
            collections: DashMap::new(),
            data_dir: None,
        }
    }

    /// Disk-backed store. Existing collection records under `dir` are
    /// loaded eagerly; the directory is created if absent.
    pub fn open(dir: impl Into<PathBuf>) -> ArgusResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let collections = DashMap::new();
        let mut loaded = 0usize;
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match Self::read_record(&path) {
                Ok(record) => {
                    collections.insert(name.to_string(), record);
                    loaded += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable collection record");
                }
            }
        }
        if loaded > 0 {
            info!(dir = %dir.display(), collections = loaded, "loaded fallback store from disk");
        }

        Ok(Self {
            collections,
            data_dir: Some(dir),
        })
    }

    fn read_record(path: &std::path::Path) -> ArgusResult<FallbackCollection> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write one collection's record. Called after each mutating batch.
    fn persist(&self, name: &str, collection: &FallbackCollection) -> ArgusResult<()> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        let path = dir.join(format!("{name}.json"));
        let raw = serde_json::to_string(collection)?;
        std::fs::write(&path, raw).map_err(|e| StoreError::PersistenceFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(collection = name, entries = collection.len(), "persisted collection record");
        Ok(())
    }

    fn remove_record(&self, name: &str) {
        let Some(dir) = &self.data_dir else {
            return;
        };
        let path = dir.join(format!("{name}.json"));
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to remove collection record");
            }
        }
    }
}

impl IVectorTransport for LocalStore {
    fn name(&self) -> &str {
        "local-fallback"
    }

    /// The local store is always reachable.
    fn ping(&self) -> ArgusResult<()> {
        Ok(())
    }

    /// Idempotent create. An existing collection with the same dimension
    /// is left untouched; replacing it requires `opts.recreate`.
    fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        opts: &CreateCollectionOptions,
    ) -> ArgusResult<()> {
        if dimension == 0 {
            return Err(StoreError::RequestFailed {
                operation: "create_collection".to_string(),
                reason: "dimension must be nonzero".to_string(),
            }
            .into());
        }

        if let Some(existing) = self.collections.get(name) {
            if !opts.recreate {
                if existing.dimension != dimension {
                    return Err(StoreError::DimensionMismatch {
                        collection: name.to_string(),
                        expected: existing.dimension,
                        actual: dimension,
                    }
                    .into());
                }
                return Ok(());
            }
            drop(existing);
            info!(collection = name, "recreating collection on explicit request");
        }

        let fresh = FallbackCollection::new(dimension, opts.metric);
        self.persist(name, &fresh)?;
        self.collections.insert(name.to_string(), fresh);
        Ok(())
    }

    /// Idempotent drop: removing an absent collection is a no-op.
    fn drop_collection(&self, name: &str) -> ArgusResult<()> {
        if self.collections.remove(name).is_some() {
            self.remove_record(name);
        }
        Ok(())
    }

    fn list_collections(&self) -> ArgusResult<Vec<CollectionInfo>> {
        let mut infos: Vec<CollectionInfo> = self
            .collections
            .iter()
            .map(|entry| CollectionInfo {
                name: entry.key().clone(),
                dimension: entry.dimension,
                metric: entry.metric,
                entry_count: entry.len(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }

    fn insert(
        &self,
        collection: &str,
        vectors: &[Vec<f32>],
        ids: Option<&[String]>,
        metadata: Option<&[serde_json::Value]>,
    ) -> ArgusResult<Vec<String>> {
        if vectors.is_empty() {
            return Ok(Vec::new());
        }

        // Auto-create, inferring the dimension from the first vector.
        let mut entry = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(|| {
                debug!(
                    collection,
                    dimension = vectors[0].len(),
                    "auto-creating collection on first insert"
                );
                FallbackCollection::new(vectors[0].len(), DistanceMetric::default())
            });

        let assigned = entry.insert(collection, vectors, ids, metadata)?;
        self.persist(collection, &entry)?;
        Ok(assigned)
    }

    fn search(
        &self,
        collection: &str,
        queries: &[Vec<f32>],
        top_k: usize,
        params: &SearchParams,
    ) -> ArgusResult<Vec<Vec<SearchResult>>> {
        let coll = self
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound {
                name: collection.to_string(),
            })?;

        queries
            .iter()
            .map(|q| coll.search(collection, q, top_k, params))
            .collect()
    }

    fn stats(&self, collection: &str) -> ArgusResult<CollectionStats> {
        let coll = self
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound {
                name: collection.to_string(),
            })?;
        Ok(CollectionStats {
            count: coll.len(),
            dimension: coll.dimension,
        })
    }
}
