//! ResilientVectorStore: one `IVectorStore` decorating a remote
//! transport and the local fallback, selected by `FallbackMode`.
//!
//! Connection health is cached; a degraded remote is only re-probed by
//! `health_check()`, never per operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{info, warn};

use argus_core::config::{FallbackMode, StoreConfig};
use argus_core::errors::{ArgusError, ArgusResult, StoreError};
use argus_core::models::{
    CollectionInfo, CollectionStats, DegradationEvent, HealthStatus, SearchResult, StoreHealth,
};
use argus_core::traits::{
    CreateCollectionOptions, IVectorStore, IVectorTransport, SearchParams,
};

use crate::local::LocalStore;
use crate::remote::HttpTransport;
use crate::retry::RetryPolicy;

pub struct ResilientVectorStore {
    remote: Option<Box<dyn IVectorTransport>>,
    fallback: LocalStore,
    mode: FallbackMode,
    endpoint: String,
    retry: RetryPolicy,
    /// Lifecycle state set by connect()/disconnect(). Cached; no probing.
    connected: AtomicBool,
    /// Whether operations are currently served by the fallback.
    degraded: AtomicBool,
    events: Mutex<Vec<DegradationEvent>>,
}

impl ResilientVectorStore {
    /// Build from config: disk-backed fallback plus, unless
    /// `fallback_mode = always`, an HTTP transport to the remote.
    pub fn new(config: &StoreConfig) -> ArgusResult<Self> {
        let fallback = LocalStore::open(&config.fallback_dir)?;
        let remote: Option<Box<dyn IVectorTransport>> = match config.fallback_mode {
            FallbackMode::Always => None,
            _ => Some(Box::new(HttpTransport::new(config)?)),
        };
        Ok(Self::assemble(
            remote,
            fallback,
            config.fallback_mode,
            config.endpoint.clone(),
            RetryPolicy::from_config(config),
        ))
    }

    /// Assemble from explicit parts. Test seam: lets suites inject a
    /// scripted transport instead of a live HTTP backend.
    pub fn with_transport(
        remote: Option<Box<dyn IVectorTransport>>,
        fallback: LocalStore,
        mode: FallbackMode,
        retry: RetryPolicy,
    ) -> Self {
        Self::assemble(remote, fallback, mode, String::from("custom-transport"), retry)
    }

    fn assemble(
        remote: Option<Box<dyn IVectorTransport>>,
        fallback: LocalStore,
        mode: FallbackMode,
        endpoint: String,
        retry: RetryPolicy,
    ) -> Self {
        let degraded = matches!(mode, FallbackMode::Always) || remote.is_none();
        Self {
            remote,
            fallback,
            mode,
            endpoint,
            retry,
            connected: AtomicBool::new(false),
            degraded: AtomicBool::new(degraded),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Whether operations currently run against the local fallback.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Drain accumulated degradation events.
    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        std::mem::take(&mut *self.events.lock().expect("events lock poisoned"))
    }

    fn record_degradation(&self, operation: &str, error: &ArgusError) {
        warn!(
            operation,
            error = %error,
            fallback = self.fallback.name(),
            "remote unreachable, degrading to local fallback"
        );
        let event = DegradationEvent::new(
            "vector-store",
            format!("{operation}: {error}"),
            self.fallback.name(),
        );
        self.events.lock().expect("events lock poisoned").push(event);
    }

    fn remote_or_error(&self) -> ArgusResult<&dyn IVectorTransport> {
        self.remote.as_deref().ok_or_else(|| {
            StoreError::ConnectionFailed {
                endpoint: self.endpoint.clone(),
                reason: "no remote transport configured".to_string(),
            }
            .into()
        })
    }

    /// Route one operation according to the fallback policy.
    ///
    /// `auto`: try the remote while healthy; a connection failure flips
    /// the store into degraded mode and re-runs the operation locally.
    /// Non-connection errors surface unchanged.
    fn with_backend<T>(
        &self,
        operation: &str,
        f: impl Fn(&dyn IVectorTransport) -> ArgusResult<T>,
    ) -> ArgusResult<T> {
        match self.mode {
            FallbackMode::Always => f(&self.fallback),
            FallbackMode::Never => f(self.remote_or_error()?),
            FallbackMode::Auto => {
                if !self.degraded.load(Ordering::Acquire) {
                    if let Some(remote) = &self.remote {
                        match f(remote.as_ref()) {
                            Ok(value) => return Ok(value),
                            Err(e) if e.is_connection_failure() => {
                                self.degraded.store(true, Ordering::Release);
                                self.record_degradation(operation, &e);
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }
                f(&self.fallback)
            }
        }
    }
}

impl IVectorStore for ResilientVectorStore {
    fn connect(&self) -> ArgusResult<()> {
        if self.connected.load(Ordering::Acquire) {
            return Ok(());
        }
        match self.mode {
            FallbackMode::Always => {
                info!(backend = self.fallback.name(), "store connected (fallback only)");
            }
            FallbackMode::Never => {
                let remote = self.remote_or_error()?;
                self.retry.run("connect", || remote.ping())?;
                info!(endpoint = %self.endpoint, "store connected to remote");
            }
            FallbackMode::Auto => {
                if let Some(remote) = &self.remote {
                    match self.retry.run("connect", || remote.ping()) {
                        Ok(()) => {
                            self.degraded.store(false, Ordering::Release);
                            info!(endpoint = %self.endpoint, "store connected to remote");
                        }
                        Err(e) => {
                            self.degraded.store(true, Ordering::Release);
                            self.record_degradation("connect", &e);
                        }
                    }
                }
            }
        }
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn disconnect(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            info!("store disconnected");
        }
    }

    fn health_check(&self) -> ArgusResult<StoreHealth> {
        match self.mode {
            FallbackMode::Always => Ok(StoreHealth {
                status: HealthStatus::Healthy,
                backend: self.fallback.name().to_string(),
                message: Some("fallback_mode=always".to_string()),
            }),
            FallbackMode::Never => {
                let remote = self.remote_or_error()?;
                match remote.ping() {
                    Ok(()) => Ok(StoreHealth {
                        status: HealthStatus::Healthy,
                        backend: remote.name().to_string(),
                        message: None,
                    }),
                    Err(e) => Ok(StoreHealth {
                        status: HealthStatus::Unhealthy,
                        backend: remote.name().to_string(),
                        message: Some(e.to_string()),
                    }),
                }
            }
            FallbackMode::Auto => {
                let Some(remote) = &self.remote else {
                    return Ok(StoreHealth {
                        status: HealthStatus::Degraded,
                        backend: self.fallback.name().to_string(),
                        message: Some("no remote transport configured".to_string()),
                    });
                };
                match remote.ping() {
                    Ok(()) => {
                        if self.degraded.swap(false, Ordering::AcqRel) {
                            info!(endpoint = %self.endpoint, "remote recovered, re-adopting");
                        }
                        Ok(StoreHealth {
                            status: HealthStatus::Healthy,
                            backend: remote.name().to_string(),
                            message: None,
                        })
                    }
                    Err(e) => {
                        if !self.degraded.swap(true, Ordering::AcqRel) {
                            self.record_degradation("health_check", &e);
                        }
                        Ok(StoreHealth {
                            status: HealthStatus::Degraded,
                            backend: self.fallback.name().to_string(),
                            message: Some(e.to_string()),
                        })
                    }
                }
            }
        }
    }

    fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        opts: &CreateCollectionOptions,
    ) -> ArgusResult<()> {
        self.with_backend("create_collection", |b| {
            b.create_collection(name, dimension, opts)
        })
    }

    fn drop_collection(&self, name: &str) -> ArgusResult<()> {
        self.with_backend("drop_collection", |b| b.drop_collection(name))
    }

    fn list_collections(&self) -> ArgusResult<Vec<CollectionInfo>> {
        self.with_backend("list_collections", |b| b.list_collections())
    }

    fn insert(
        &self,
        collection: &str,
        vectors: &[Vec<f32>],
        ids: Option<&[String]>,
        metadata: Option<&[serde_json::Value]>,
    ) -> ArgusResult<Vec<String>> {
        self.with_backend("insert", |b| b.insert(collection, vectors, ids, metadata))
    }

    fn search(
        &self,
        collection: &str,
        queries: &[Vec<f32>],
        top_k: usize,
        params: &SearchParams,
    ) -> ArgusResult<Vec<Vec<SearchResult>>> {
        self.with_backend("search", |b| b.search(collection, queries, top_k, params))
    }

    fn stats(&self, collection: &str) -> ArgusResult<CollectionStats> {
        self.with_backend("stats", |b| b.stats(collection))
    }
}
