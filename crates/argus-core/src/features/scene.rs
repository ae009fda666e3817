use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FeatureType;

/// What kind of media a handle points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

/// Normalized media handle returned by preprocessing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaHandle {
    pub id: String,
    /// Original source location (path, URL, object key).
    pub source: String,
    pub kind: MediaKind,
    pub duration_secs: Option<f64>,
}

/// Per-scene feature bundle produced by the external extractor.
///
/// Scenes are contiguous segments from upstream scene detection; each
/// carries one vector per modality the extractor produced for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFeatures {
    pub start_time: f64,
    pub end_time: f64,
    /// BTreeMap keeps fusion iteration order deterministic.
    pub features: BTreeMap<FeatureType, Vec<f32>>,
}

impl SceneFeatures {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
            features: BTreeMap::new(),
        }
    }

    pub fn with_feature(mut self, feature_type: FeatureType, values: Vec<f32>) -> Self {
        self.features.insert(feature_type, values);
        self
    }

    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Visual-interest score used by keyframe sampling.
    ///
    /// Motion magnitude plus CNN feature variance; scenes with neither
    /// modality fall back to their duration so sampling stays total.
    pub fn visual_interest(&self) -> f64 {
        let motion = self
            .features
            .get(&FeatureType::Motion)
            .map(|v| (v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>()).sqrt());
        let cnn_variance = self.features.get(&FeatureType::Cnn).map(|v| {
            if v.is_empty() {
                return 0.0;
            }
            let mean = v.iter().map(|x| *x as f64).sum::<f64>() / v.len() as f64;
            v.iter().map(|x| (*x as f64 - mean).powi(2)).sum::<f64>() / v.len() as f64
        });

        match (motion, cnn_variance) {
            (None, None) => self.duration(),
            (m, c) => m.unwrap_or(0.0) + c.unwrap_or(0.0),
        }
    }
}
