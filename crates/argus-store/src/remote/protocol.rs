//! Versioned wire protocol for the remote vector backend: JSON
//! envelopes with forward compatibility. Argus defines its own protocol
//! rather than mimicking any particular vector database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use argus_core::constants::PROTOCOL_VERSION;
use argus_core::models::{CollectionInfo, CollectionStats, DistanceMetric, SearchResult};

/// Envelope for all backend requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendRequest<T> {
    /// Protocol version for forward compatibility.
    pub version: String,
    /// Unique request ID for tracing.
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T: Serialize> BackendRequest<T> {
    pub fn new(payload: T) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Envelope for all backend responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendResponse<T> {
    pub version: String,
    /// Echoed request ID.
    pub request_id: String,
    pub success: bool,
    /// Error message if `success` is false.
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> BackendResponse<T> {
    pub fn ok(request_id: String, data: T) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id,
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn err(request_id: String, error: String) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id,
            success: false,
            error: Some(error),
            data: None,
        }
    }
}

/// Empty payload/acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCollectionPayload {
    pub name: String,
    pub dimension: usize,
    pub metric: DistanceMetric,
    pub recreate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropCollectionPayload {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCollectionsData {
    pub collections: Vec<CollectionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertPayload {
    pub collection: String,
    pub vectors: Vec<Vec<f32>>,
    pub ids: Option<Vec<String>>,
    pub metadata: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertData {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPayload {
    pub collection: String,
    pub queries: Vec<Vec<f32>>,
    pub top_k: usize,
    pub filter: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchData {
    pub results: Vec<Vec<SearchResult>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsPayload {
    pub collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsData {
    pub stats: CollectionStats,
}
