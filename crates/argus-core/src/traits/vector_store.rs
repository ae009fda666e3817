use serde::{Deserialize, Serialize};

use crate::errors::ArgusResult;
use crate::models::{CollectionInfo, CollectionStats, DistanceMetric, SearchResult, StoreHealth};

/// Options for `create_collection`.
///
/// Create is idempotent by default: an existing collection with the same
/// dimension is left untouched. Destroying existing data requires the
/// explicit `recreate` flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateCollectionOptions {
    pub metric: DistanceMetric,
    /// Drop any existing collection of this name first.
    pub recreate: bool,
}

/// Per-search knobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Metadata equality filter: every key present must match exactly.
    pub filter: Option<serde_json::Value>,
}

/// Low-level vector backend surface: one implementation per transport
/// (local in-memory fallback, remote HTTP). The resilient store decorates
/// these with connection policy; nothing else should call them directly.
pub trait IVectorTransport: Send + Sync {
    /// Human-readable transport name for logs and degradation events.
    fn name(&self) -> &str;

    fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        opts: &CreateCollectionOptions,
    ) -> ArgusResult<()>;
    fn drop_collection(&self, name: &str) -> ArgusResult<()>;
    fn list_collections(&self) -> ArgusResult<Vec<CollectionInfo>>;

    /// Insert vectors, auto-creating the collection (dimension inferred
    /// from the first vector) if it does not exist. Returns one id per
    /// vector; generated when `ids` is `None`.
    fn insert(
        &self,
        collection: &str,
        vectors: &[Vec<f32>],
        ids: Option<&[String]>,
        metadata: Option<&[serde_json::Value]>,
    ) -> ArgusResult<Vec<String>>;

    /// One result list per query vector, sorted ascending by distance,
    /// truncated to `top_k`.
    fn search(
        &self,
        collection: &str,
        queries: &[Vec<f32>],
        top_k: usize,
        params: &SearchParams,
    ) -> ArgusResult<Vec<Vec<SearchResult>>>;

    fn stats(&self, collection: &str) -> ArgusResult<CollectionStats>;

    /// Cheap reachability probe.
    fn ping(&self) -> ArgusResult<()>;
}

/// The vector store as the rest of the system sees it: transport
/// operations plus connection lifecycle and health.
pub trait IVectorStore: Send + Sync {
    /// Establish the backend connection. Idempotent.
    fn connect(&self) -> ArgusResult<()>;
    /// Cached connection state; does not re-probe the backend.
    fn is_connected(&self) -> bool;
    /// Tear down the connection. Idempotent.
    fn disconnect(&self);
    /// Re-validate backend health. This is the only path that re-probes
    /// a degraded remote and re-adopts it when it recovers.
    fn health_check(&self) -> ArgusResult<StoreHealth>;

    fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        opts: &CreateCollectionOptions,
    ) -> ArgusResult<()>;
    fn drop_collection(&self, name: &str) -> ArgusResult<()>;
    fn list_collections(&self) -> ArgusResult<Vec<CollectionInfo>>;
    fn insert(
        &self,
        collection: &str,
        vectors: &[Vec<f32>],
        ids: Option<&[String]>,
        metadata: Option<&[serde_json::Value]>,
    ) -> ArgusResult<Vec<String>>;
    fn search(
        &self,
        collection: &str,
        queries: &[Vec<f32>],
        top_k: usize,
        params: &SearchParams,
    ) -> ArgusResult<Vec<Vec<SearchResult>>>;
    fn stats(&self, collection: &str) -> ArgusResult<CollectionStats>;
}
