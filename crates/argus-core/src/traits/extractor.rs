use crate::errors::ArgusResult;
use crate::features::{MediaHandle, SceneFeatures};

/// External boundary to the perceptual/neural feature extractors.
///
/// Argus never computes features itself; implementations live outside
/// the core and are injected into the pipeline.
pub trait IFeatureExtractor: Send + Sync {
    /// Normalize a raw media source into a handle the extractor accepts.
    fn preprocess(&self, source: &str) -> ArgusResult<MediaHandle>;

    /// Produce per-scene feature bundles for the whole media item.
    fn extract(&self, handle: &MediaHandle) -> ArgusResult<Vec<SceneFeatures>>;
}
