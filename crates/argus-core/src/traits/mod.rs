//! Seams between subsystems and to external collaborators.

mod enricher;
mod extractor;
mod vector_store;

pub use enricher::IMetadataEnricher;
pub use extractor::IFeatureExtractor;
pub use vector_store::{CreateCollectionOptions, IVectorStore, IVectorTransport, SearchParams};
