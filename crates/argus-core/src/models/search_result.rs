use serde::{Deserialize, Serialize};

/// One hit from a similarity search. Never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    /// Raw distance under the collection's metric (smaller = closer).
    pub distance: f32,
    /// Metadata stored alongside the vector at insert time.
    pub metadata: serde_json::Value,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, distance: f32) -> Self {
        Self {
            id: id.into(),
            distance,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Similarity score in (0, 1]: `1 / (1 + distance)`.
    pub fn score(&self) -> f64 {
        1.0 / (1.0 + f64::from(self.distance.max(0.0)))
    }

    /// Content id the matched vector belongs to.
    ///
    /// Falls back to the vector id when the insert carried no owner.
    pub fn content_id(&self) -> &str {
        self.metadata
            .get("content_id")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.id)
    }

    /// Timestamp of the matched vector within its content, if recorded.
    pub fn timestamp(&self) -> Option<f64> {
        self.metadata.get("timestamp").and_then(|v| v.as_f64())
    }
}
