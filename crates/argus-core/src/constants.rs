/// Argus system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire protocol version for the remote vector backend.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Collection sizes at or above this run the brute-force scan in parallel.
pub const PARALLEL_SCAN_THRESHOLD: usize = 4096;

/// Maximum vectors per store request; larger batches are chunked.
pub const MAX_BATCH_SIZE: usize = 256;

/// Distance below which two hash vectors count as an exact match.
pub const EXACT_HASH_EPSILON: f32 = 1e-6;

/// Fusion weight applied to feature types without a dedicated weight.
pub const DEFAULT_FUSION_WEIGHT: f64 = 0.1;
