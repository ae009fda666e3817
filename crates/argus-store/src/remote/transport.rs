//! Blocking HTTP client for the remote vector backend.
//!
//! Every call is a POST of a `BackendRequest` envelope; transport-level
//! failures surface as `StoreError::ConnectionFailed` so the resilient
//! store can degrade, while application-level rejections stay
//! `RequestFailed` and are surfaced unchanged.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use argus_core::config::StoreConfig;
use argus_core::errors::{ArgusResult, StoreError};
use argus_core::models::{CollectionInfo, CollectionStats, SearchResult};
use argus_core::traits::{CreateCollectionOptions, IVectorTransport, SearchParams};

use super::protocol::{
    Ack, BackendRequest, BackendResponse, CreateCollectionPayload, DropCollectionPayload,
    InsertData, InsertPayload, ListCollectionsData, SearchData, SearchPayload, StatsData,
    StatsPayload,
};

/// HTTP transport to a remote vector backend.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &StoreConfig) -> ArgusResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| StoreError::ConnectionFailed {
                endpoint: config.endpoint.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn post<P: Serialize, D: DeserializeOwned>(&self, path: &str, payload: P) -> ArgusResult<D> {
        let url = format!("{}/{path}", self.base_url);
        let request = BackendRequest::new(payload);
        debug!(%url, request_id = %request.request_id, "backend request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| StoreError::ConnectionFailed {
                endpoint: url.clone(),
                reason: e.to_string(),
            })?;

        let envelope: BackendResponse<D> =
            response.json().map_err(|e| StoreError::ConnectionFailed {
                endpoint: url.clone(),
                reason: format!("malformed response: {e}"),
            })?;

        if !envelope.success {
            return Err(StoreError::RequestFailed {
                operation: path.to_string(),
                reason: envelope
                    .error
                    .unwrap_or_else(|| "unspecified backend error".to_string()),
            }
            .into());
        }
        envelope.data.ok_or_else(|| {
            StoreError::RequestFailed {
                operation: path.to_string(),
                reason: "missing response data".to_string(),
            }
            .into()
        })
    }
}

impl IVectorTransport for HttpTransport {
    fn name(&self) -> &str {
        "remote-backend"
    }

    fn ping(&self) -> ArgusResult<()> {
        let _: Ack = self.post("v1/health", Ack {})?;
        Ok(())
    }

    fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        opts: &CreateCollectionOptions,
    ) -> ArgusResult<()> {
        let _: Ack = self.post(
            "v1/collections/create",
            CreateCollectionPayload {
                name: name.to_string(),
                dimension,
                metric: opts.metric,
                recreate: opts.recreate,
            },
        )?;
        Ok(())
    }

    fn drop_collection(&self, name: &str) -> ArgusResult<()> {
        let _: Ack = self.post(
            "v1/collections/drop",
            DropCollectionPayload {
                name: name.to_string(),
            },
        )?;
        Ok(())
    }

    fn list_collections(&self) -> ArgusResult<Vec<CollectionInfo>> {
        let data: ListCollectionsData = self.post("v1/collections/list", Ack {})?;
        Ok(data.collections)
    }

    fn insert(
        &self,
        collection: &str,
        vectors: &[Vec<f32>],
        ids: Option<&[String]>,
        metadata: Option<&[serde_json::Value]>,
    ) -> ArgusResult<Vec<String>> {
        let data: InsertData = self.post(
            "v1/vectors/insert",
            InsertPayload {
                collection: collection.to_string(),
                vectors: vectors.to_vec(),
                ids: ids.map(<[String]>::to_vec),
                metadata: metadata.map(<[serde_json::Value]>::to_vec),
            },
        )?;
        Ok(data.ids)
    }

    fn search(
        &self,
        collection: &str,
        queries: &[Vec<f32>],
        top_k: usize,
        params: &SearchParams,
    ) -> ArgusResult<Vec<Vec<SearchResult>>> {
        let data: SearchData = self.post(
            "v1/vectors/search",
            SearchPayload {
                collection: collection.to_string(),
                queries: queries.to_vec(),
                top_k,
                filter: params.filter.clone(),
            },
        )?;
        Ok(data.results)
    }

    fn stats(&self, collection: &str) -> ArgusResult<CollectionStats> {
        let data: StatsData = self.post(
            "v1/collections/stats",
            StatsPayload {
                collection: collection.to_string(),
            },
        )?;
        Ok(data.stats)
    }
}
