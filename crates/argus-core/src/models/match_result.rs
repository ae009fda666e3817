use serde::{Deserialize, Serialize};

/// Final identification output for one piece of matched content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub content_id: String,
    pub title: String,
    /// Always within [0, 1].
    pub confidence: f64,
    /// Which path produced the match, e.g. `cosine_similarity` or
    /// `ensemble_3_scenes`.
    pub match_type: String,
    /// Matched position within the target content, in seconds.
    pub timestamp: Option<f64>,
    pub additional_metadata: serde_json::Value,
}

impl MatchResult {
    pub fn new(content_id: impl Into<String>, confidence: f64, match_type: impl Into<String>) -> Self {
        let content_id = content_id.into();
        Self {
            title: content_id.clone(),
            content_id,
            confidence: confidence.clamp(0.0, 1.0),
            match_type: match_type.into(),
            timestamp: None,
            additional_metadata: serde_json::Value::Null,
        }
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        if let Some(title) = metadata.get("title").and_then(|v| v.as_str()) {
            self.title = title.to_string();
        }
        self.additional_metadata = metadata;
        self
    }

    /// Merge extra fields into `additional_metadata`, keeping existing keys.
    pub fn merge_metadata(&mut self, extra: &serde_json::Value) {
        if let Some(title) = extra.get("title").and_then(|v| v.as_str()) {
            self.title = title.to_string();
        }
        match (&mut self.additional_metadata, extra) {
            (serde_json::Value::Object(base), serde_json::Value::Object(incoming)) => {
                for (k, v) in incoming {
                    base.entry(k.clone()).or_insert_with(|| v.clone());
                }
            }
            (slot @ serde_json::Value::Null, incoming) => {
                *slot = incoming.clone();
            }
            _ => {}
        }
    }
}
