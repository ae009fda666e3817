//! # argus-query
//!
//! Query-side engine over the vector store: per-modality collection
//! routing, a TTL query cache, weighted multi-feature scene fusion, and
//! chunked batch querying.

mod cache;
mod engine;
mod fusion;
mod routing;

pub use cache::QueryCache;
pub use engine::VectorQueryEngine;
pub use fusion::fuse_scene_results;
pub use routing::CollectionRouter;
