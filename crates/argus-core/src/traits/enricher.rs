use crate::errors::ArgusResult;

/// External, optional metadata source consulted during verification.
///
/// Returned fields are merged into `MatchResult.additional_metadata`;
/// enrichment failures downgrade to a log line, never to a lost match.
pub trait IMetadataEnricher: Send + Sync {
    fn enrich(&self, content_id: &str) -> ArgusResult<serde_json::Value>;
}
