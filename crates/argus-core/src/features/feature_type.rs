use serde::{Deserialize, Serialize};

/// The closed set of feature modalities Argus indexes.
///
/// Each variant fixes its vector dimension, default collection, and
/// fusion weight, so routing never goes through free-form strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    /// Deep visual embedding of a scene keyframe.
    Cnn,
    /// Binary perceptual hash of a keyframe, stored as a 0/1 vector.
    PerceptualHash,
    /// Optical-flow motion signature across a scene.
    Motion,
    /// Mel-spectrogram embedding of the scene's audio track.
    AudioSpectrogram,
    /// Quantized color distribution of a keyframe.
    ColorHistogram,
}

impl FeatureType {
    /// All feature types, in fusion-iteration order.
    pub const ALL: [FeatureType; 5] = [
        FeatureType::Cnn,
        FeatureType::PerceptualHash,
        FeatureType::Motion,
        FeatureType::AudioSpectrogram,
        FeatureType::ColorHistogram,
    ];

    /// The fixed vector dimension for this modality.
    pub fn dimension(self) -> usize {
        match self {
            FeatureType::Cnn => 2048,
            FeatureType::PerceptualHash => 64,
            FeatureType::Motion => 256,
            FeatureType::AudioSpectrogram => 512,
            FeatureType::ColorHistogram => 256,
        }
    }

    /// The default collection this modality is indexed into.
    pub fn collection(self) -> &'static str {
        match self {
            FeatureType::Cnn => "features_cnn",
            FeatureType::PerceptualHash => "features_perceptual_hash",
            FeatureType::Motion => "features_motion",
            FeatureType::AudioSpectrogram => "features_audio_spectrogram",
            FeatureType::ColorHistogram => "features_color_histogram",
        }
    }

    /// Weight of this modality in multi-feature scene fusion.
    pub fn fusion_weight(self) -> f64 {
        match self {
            FeatureType::Cnn => 0.5,
            FeatureType::PerceptualHash => 0.3,
            FeatureType::Motion => 0.2,
            FeatureType::AudioSpectrogram => 0.3,
            FeatureType::ColorHistogram => crate::constants::DEFAULT_FUSION_WEIGHT,
        }
    }

    /// Stable snake_case label, matching the serde representation.
    pub fn label(self) -> &'static str {
        match self {
            FeatureType::Cnn => "cnn",
            FeatureType::PerceptualHash => "perceptual_hash",
            FeatureType::Motion => "motion",
            FeatureType::AudioSpectrogram => "audio_spectrogram",
            FeatureType::ColorHistogram => "color_histogram",
        }
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_serde_representation() {
        for ft in FeatureType::ALL {
            let json = serde_json::to_string(&ft).unwrap();
            assert_eq!(json, format!("\"{}\"", ft.label()));
        }
    }

    #[test]
    fn collections_are_unique() {
        let mut names: Vec<&str> = FeatureType::ALL.iter().map(|f| f.collection()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FeatureType::ALL.len());
    }

    #[test]
    fn dimensions_are_nonzero() {
        for ft in FeatureType::ALL {
            assert!(ft.dimension() > 0);
        }
    }
}
