//! Feature type → collection routing.

use std::collections::HashMap;

use argus_core::features::FeatureType;

/// Maps each feature modality to its target collection.
///
/// The convention is `features_<type>`; config may override individual
/// modalities, e.g. to point CNN features at a re-indexed collection.
#[derive(Debug, Clone, Default)]
pub struct CollectionRouter {
    overrides: HashMap<FeatureType, String>,
}

impl CollectionRouter {
    pub fn new(overrides: HashMap<FeatureType, String>) -> Self {
        Self { overrides }
    }

    pub fn collection_for(&self, feature_type: FeatureType) -> &str {
        self.overrides
            .get(&feature_type)
            .map(String::as_str)
            .unwrap_or_else(|| feature_type.collection())
    }
}
