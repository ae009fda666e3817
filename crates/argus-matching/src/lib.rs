//! # argus-matching
//!
//! Matching engine: distance primitives, per-modality matchers mapping
//! raw distance to confidence, and scene/video-level aggregation.

pub mod algorithms;

mod engine;

pub use algorithms::{cosine_similarity, hamming_distance, hamming_distance_bits};
pub use engine::{MatchAlgorithm, MatchingEngine};
