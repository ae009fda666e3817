//! Default values for all subsystem configs, in one place.

pub const DEFAULT_ENDPOINT: &str = "http://localhost:19530";
pub const DEFAULT_FALLBACK_DIR: &str = ".argus/fallback";
pub const DEFAULT_CONNECT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_CONNECT_BASE_DELAY_MS: u64 = 200;
pub const DEFAULT_CONNECT_MAX_DELAY_MS: u64 = 2_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_BATCH_SIZE: usize = 64;
pub const DEFAULT_OVERSAMPLE_FACTOR: usize = 2;

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.05;

pub const DEFAULT_MAX_SCENES_PER_QUERY: usize = 20;
pub const DEFAULT_PREFETCH_CANDIDATES: usize = 50;
pub const DEFAULT_ALIGNMENT_WINDOW_SECS: f64 = 5.0;
pub const DEFAULT_VERIFICATION_CONCURRENCY: usize = 10;
pub const DEFAULT_VERIFICATION_TOP_K: usize = 20;
pub const DEFAULT_QUERY_DEADLINE_MS: u64 = 30_000;
