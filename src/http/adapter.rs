//! Per-collection resource adapter.
//!
//! # Responsibilities
//! - Bind one `ResourceService` to PUT/GET/DELETE `/{id}`, `/__count`, `/__ids`
//! - Decode (and gunzip) request bodies, reject identifier mismatches
//! - Classify service failures via `http::error`
//! - Echo the transaction id and report every call to the metrics sink
//!
//! # Design Decisions
//! - Generic over the service so resources stay strongly typed
//! - Erased behind `MountedCollection` for the registry and readiness checks
//! - Resources are encoded before the head is sent, so encoding failures are 500s

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::decompression::RequestDecompressionLayer;

use crate::health::{Status, StatusChecker};
use crate::http::error::ApiError;
use crate::http::ids::{stream_ids, DEFAULT_ID_BUFFER};
use crate::http::request::{TransactionId, X_REQUEST_ID};
use crate::http::response::{json_body, json_message};
use crate::observability::metrics::{MetricsSink, NoopSink, Operation};
use crate::service::{ResourceService, ServiceError};

/// Default cap on PUT bodies (after decompression).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Knobs shared by every mounted collection.
#[derive(Clone)]
pub struct AdapterSettings {
    /// Capacity of the id enumeration channel.
    pub id_buffer: usize,
    /// Largest accepted PUT body, in bytes.
    pub max_body_bytes: usize,
    pub metrics: Arc<dyn MetricsSink>,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            id_buffer: DEFAULT_ID_BUFFER,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            metrics: Arc::new(NoopSink),
        }
    }
}

/// A collection as seen by the registry, router and readiness checks.
#[async_trait]
pub trait MountedCollection: StatusChecker {
    /// Run the service's one-off setup.
    async fn initialise(&self) -> Result<(), ServiceError>;

    /// Routes relative to the collection prefix.
    fn routes(self: Arc<Self>) -> Router;
}

/// HTTP adapter for one named collection.
pub struct ResourceAdapter<S: ResourceService> {
    name: String,
    service: Arc<S>,
    settings: AdapterSettings,
}

impl<S: ResourceService> ResourceAdapter<S> {
    pub fn new(name: impl Into<String>, service: Arc<S>, settings: AdapterSettings) -> Self {
        Self {
            name: name.into(),
            service,
            settings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn write_resource(&self, id: &str, tid: &TransactionId, body: Body) -> Result<Response, ApiError> {
        let bytes = axum::body::to_bytes(body, self.settings.max_body_bytes)
            .await
            .map_err(|e| {
                tracing::warn!(collection = %self.name, transaction_id = %tid, error = %e, "Failed to read request body");
                ApiError::bad_request(e.to_string())
            })?;

        let decoded = self.service.decode_body(&bytes).map_err(|e| {
            tracing::warn!(collection = %self.name, transaction_id = %tid, uuid = %id, error = %e, "Failed to decode body");
            ApiError::bad_request(e.to_string())
        })?;

        if decoded.id != id {
            return Err(ApiError::bad_request(format!(
                "uuid does not match: '{}' '{}'",
                decoded.id, id
            )));
        }

        self.service.write(decoded.resource, tid.as_str()).await?;
        Ok(json_message(StatusCode::OK, "PUT successful"))
    }

    async fn read_resource(&self, id: &str, tid: &TransactionId) -> Result<Response, ApiError> {
        let Some(resource) = self.service.read(id, tid.as_str()).await? else {
            return Ok(StatusCode::NOT_FOUND.into_response());
        };
        let body = serde_json::to_vec(&resource).map_err(|e| ApiError::internal(e.to_string()))?;
        Ok(json_body(StatusCode::OK, body))
    }

    async fn delete_resource(&self, id: &str, tid: &TransactionId) -> Result<Response, ApiError> {
        if self.service.delete(id, tid.as_str()).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Ok(StatusCode::NOT_FOUND.into_response())
        }
    }

    async fn count_resources(&self) -> Result<Response, ApiError> {
        // Count failures are always reported as unavailable.
        let count = self
            .service
            .count()
            .await
            .map_err(|e| ApiError::unavailable(e.to_string()))?;
        Ok(json_body(StatusCode::OK, count.to_string()))
    }

    fn list_ids(&self, tid: &TransactionId) -> Response {
        match Arc::clone(&self.service).id_service() {
            Some(producer) => stream_ids(producer, self.settings.id_buffer, self.name.clone(), tid.clone()),
            None => StatusCode::NOT_IMPLEMENTED.into_response(),
        }
    }

    /// Log failures, stamp the transaction id and record metrics.
    fn finish(
        &self,
        operation: Operation,
        tid: &TransactionId,
        started: Instant,
        outcome: Result<Response, ApiError>,
    ) -> Response {
        let mut response = match outcome {
            Ok(response) => response,
            Err(err) => {
                if err.status().is_server_error() {
                    tracing::error!(
                        collection = %self.name,
                        operation = operation.as_str(),
                        transaction_id = %tid,
                        status = err.status().as_u16(),
                        error = %err.message(),
                        "Request failed"
                    );
                } else {
                    tracing::warn!(
                        collection = %self.name,
                        operation = operation.as_str(),
                        transaction_id = %tid,
                        status = err.status().as_u16(),
                        error = %err.message(),
                        "Request rejected"
                    );
                }
                err.into_response()
            }
        };

        if let Some(value) = tid.header_value() {
            response
                .headers_mut()
                .insert(HeaderName::from_static(X_REQUEST_ID), value);
        }
        self.record(operation, response.status(), started.elapsed());
        response
    }

    fn record(&self, operation: Operation, status: StatusCode, elapsed: Duration) {
        self.settings
            .metrics
            .record_request(&self.name, operation, status.as_u16(), elapsed);
    }
}

#[async_trait]
impl<S: ResourceService> StatusChecker for ResourceAdapter<S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Status {
        self.service.check().await.into()
    }
}

#[async_trait]
impl<S: ResourceService> MountedCollection for ResourceAdapter<S> {
    async fn initialise(&self) -> Result<(), ServiceError> {
        self.service.initialise().await
    }

    fn routes(self: Arc<Self>) -> Router {
        Router::new()
            .route("/__count", get(count::<S>))
            .route("/__ids", get(ids::<S>))
            .route("/{id}", get(read::<S>).put(write::<S>).delete(delete::<S>))
            // Only gzip is enabled; other encodings reach the handler untouched.
            .layer(RequestDecompressionLayer::new().pass_through_unaccepted(true))
            .with_state(self)
    }
}

type AdapterState<S> = State<Arc<ResourceAdapter<S>>>;

async fn write<S: ResourceService>(
    State(adapter): AdapterState<S>,
    Path(id): Path<String>,
    tid: TransactionId,
    body: Body,
) -> Response {
    let started = Instant::now();
    let outcome = adapter.write_resource(&id, &tid, body).await;
    adapter.finish(Operation::Write, &tid, started, outcome)
}

async fn read<S: ResourceService>(
    State(adapter): AdapterState<S>,
    Path(id): Path<String>,
    tid: TransactionId,
) -> Response {
    let started = Instant::now();
    let outcome = adapter.read_resource(&id, &tid).await;
    adapter.finish(Operation::Read, &tid, started, outcome)
}

async fn delete<S: ResourceService>(
    State(adapter): AdapterState<S>,
    Path(id): Path<String>,
    tid: TransactionId,
) -> Response {
    let started = Instant::now();
    let outcome = adapter.delete_resource(&id, &tid).await;
    adapter.finish(Operation::Delete, &tid, started, outcome)
}

async fn count<S: ResourceService>(State(adapter): AdapterState<S>, tid: TransactionId) -> Response {
    let started = Instant::now();
    let outcome = adapter.count_resources().await;
    adapter.finish(Operation::Count, &tid, started, outcome)
}

async fn ids<S: ResourceService>(State(adapter): AdapterState<S>, tid: TransactionId) -> Response {
    let started = Instant::now();
    let response = adapter.list_ids(&tid);
    adapter.finish(Operation::Ids, &tid, started, Ok(response))
}
