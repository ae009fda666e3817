//! Error taxonomy: one enum per subsystem plus the `ArgusError` umbrella.

mod match_error;
mod pipeline_error;
mod query_error;
mod store_error;

pub use match_error::MatchError;
pub use pipeline_error::PipelineError;
pub use query_error::QueryError;
pub use store_error::StoreError;

/// Result alias used across the workspace.
pub type ArgusResult<T> = Result<T, ArgusError>;

/// Top-level error type. Subsystem errors convert via `From`.
#[derive(Debug, thiserror::Error)]
pub enum ArgusError {
    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("query error: {0}")]
    QueryError(#[from] QueryError),

    #[error("match error: {0}")]
    MatchError(#[from] MatchError),

    #[error("pipeline error: {0}")]
    PipelineError(#[from] PipelineError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl ArgusError {
    /// Whether this error indicates the remote backend is unreachable.
    ///
    /// The resilient store uses this to decide between degrading to the
    /// local fallback and surfacing the error unchanged.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            ArgusError::StoreError(StoreError::ConnectionFailed { .. })
        )
    }
}
