/// Query-engine errors.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },
}
