use serde::{Deserialize, Serialize};

use super::FeatureType;
use crate::errors::{ArgusResult, StoreError};

/// One extracted feature vector. Immutable once inserted into a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Content the vector was extracted from.
    pub owner_id: String,
    pub feature_type: FeatureType,
    pub values: Vec<f32>,
    /// Scene/segment the vector belongs to, if scoped below whole-content.
    pub segment_id: Option<String>,
    /// Position of the segment within the content, in seconds.
    pub timestamp: Option<f64>,
}

impl FeatureVector {
    pub fn new(owner_id: impl Into<String>, feature_type: FeatureType, values: Vec<f32>) -> Self {
        Self {
            owner_id: owner_id.into(),
            feature_type,
            values,
            segment_id: None,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_segment(mut self, segment_id: impl Into<String>) -> Self {
        self.segment_id = Some(segment_id.into());
        self
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Reject vectors whose length disagrees with their declared modality.
    pub fn validate(&self) -> ArgusResult<()> {
        let expected = self.feature_type.dimension();
        if self.values.len() != expected {
            return Err(StoreError::DimensionMismatch {
                collection: self.feature_type.collection().to_string(),
                expected,
                actual: self.values.len(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_correct_dimension() {
        let v = FeatureVector::new("c1", FeatureType::PerceptualHash, vec![0.0; 64]);
        assert!(v.validate().is_ok());
    }

    #[test]
    fn validate_rejects_wrong_dimension() {
        let v = FeatureVector::new("c1", FeatureType::PerceptualHash, vec![0.0; 63]);
        let err = v.validate().unwrap_err();
        assert!(err.to_string().contains("64"));
    }
}
