/// Query-pipeline errors. Stage failures are terminal for the request.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("preprocessing failed: {reason}")]
    PreprocessFailed { reason: String },

    #[error("feature extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    #[error("stage {stage} failed: {reason}")]
    StageFailed { stage: String, reason: String },

    #[error("deadline exceeded in stage {stage} after {elapsed_ms}ms")]
    DeadlineExceeded { stage: String, elapsed_ms: u64 },
}
