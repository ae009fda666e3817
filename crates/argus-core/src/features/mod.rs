//! Feature modalities and the vectors extracted from media.

mod feature_type;
mod scene;
mod vector;

pub use feature_type::FeatureType;
pub use scene::{MediaHandle, MediaKind, SceneFeatures};
pub use vector::FeatureVector;
