/// Vector-store errors, covering both the remote backend and the local fallback.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection to {endpoint} failed: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("collection {collection}: expected dimension {expected}, got {actual}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    #[error("collection not found: {name}")]
    CollectionNotFound { name: String },

    #[error("persistence failed at {path}: {reason}")]
    PersistenceFailed { path: String, reason: String },

    #[error("backend rejected {operation}: {reason}")]
    RequestFailed { operation: String, reason: String },
}
