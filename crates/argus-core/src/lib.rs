//! # argus-core
//!
//! Foundation crate for the Argus content-identification system.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod features;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ArgusConfig;
pub use errors::{ArgusError, ArgusResult};
pub use features::{FeatureType, FeatureVector, MediaHandle, SceneFeatures};
pub use models::{Candidate, MatchResult, QueryResponse, SearchResult};
