use serde::{Deserialize, Serialize};

/// Distance metric a collection is indexed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Cosine,
    InnerProduct,
}

/// Summary of one collection, as reported by `list_collections`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub dimension: usize,
    pub metric: DistanceMetric,
    pub entry_count: usize,
}

/// Per-collection stats, as reported by `stats`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CollectionStats {
    pub count: usize,
    pub dimension: usize,
}
