//! # argus-store
//!
//! The resilient vector store: a remote backend decorated with an
//! automatic local fallback. One `IVectorStore` implementation routes
//! every operation by fallback policy; the fallback persists one JSON
//! record per collection and answers searches by brute-force exact scan.

pub mod local;
pub mod remote;

mod resilient;
mod retry;

pub use local::{FallbackCollection, LocalStore};
pub use remote::HttpTransport;
pub use resilient::ResilientVectorStore;
pub use retry::RetryPolicy;
