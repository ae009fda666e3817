/// Matching-engine errors.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("hash length mismatch: {left} vs {right} bytes")]
    HashLengthMismatch { left: usize, right: usize },

    #[error("unsupported algorithm for this feature set: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },
}
