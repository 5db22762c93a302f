//! Resource service abstraction.
//!
//! # Data Flow
//! ```text
//! HTTP adapter (http/adapter.rs)
//!     → decode_body (bytes → Decoded<Resource>)
//!     → write / read / delete / count
//!     → Result<_, ServiceError>   (no HTTP vocabulary here)
//!
//! Enumeration (optional capability):
//!     id_service() probe
//!     → IdService::ids(sender, cancel)
//!     → bounded channel consumed by http/ids.rs
//! ```
//!
//! # Design Decisions
//! - Services are storage-agnostic; the adapter never inspects their state
//! - Failures are typed (`ServiceError`), classification happens at the edge
//! - Enumeration is opt-in: services that cannot list ids answer 501

pub mod error;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use error::{DecodeError, ServiceError};
pub use memory::MemoryService;

/// A decoded request body and the identifier it declares for itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<R> {
    pub resource: R,
    pub id: String,
}

impl<R> Decoded<R> {
    pub fn new(resource: R, id: impl Into<String>) -> Self {
        Self {
            resource,
            id: id.into(),
        }
    }
}

/// One enumerated identifier, written as `{"id":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdEntry {
    pub id: String,
}

impl IdEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Functions any read-write collection needs to implement.
///
/// Every state-changing or reading call receives the request's transaction
/// id so services can tag their own logs with it.
#[async_trait]
pub trait ResourceService: Send + Sync + 'static {
    /// The resource type stored by this collection.
    type Resource: Serialize + Send + Sync + 'static;

    /// Decode a request body into a resource and its declared identifier.
    fn decode_body(&self, body: &[u8]) -> Result<Decoded<Self::Resource>, DecodeError>;

    /// Create or replace a resource.
    async fn write(&self, resource: Self::Resource, transaction_id: &str) -> Result<(), ServiceError>;

    /// Fetch a resource; `Ok(None)` when it does not exist.
    async fn read(&self, id: &str, transaction_id: &str) -> Result<Option<Self::Resource>, ServiceError>;

    /// Remove a resource; `Ok(false)` when there was nothing to remove.
    async fn delete(&self, id: &str, transaction_id: &str) -> Result<bool, ServiceError>;

    /// Number of resources in the collection.
    async fn count(&self) -> Result<u64, ServiceError>;

    /// Liveness of the underlying storage.
    async fn check(&self) -> Result<(), ServiceError>;

    /// One-off setup run before the collection accepts traffic.
    async fn initialise(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Capability probe for identifier enumeration.
    ///
    /// Services that can list their identifiers override this with
    /// `Some(self)`.
    fn id_service(self: Arc<Self>) -> Option<Arc<dyn IdService>> {
        None
    }
}

/// Streams every identifier in a collection.
#[async_trait]
pub trait IdService: Send + Sync + 'static {
    /// Push identifiers into `ids` until exhausted, `cancel` fires, or the
    /// receiving side goes away.
    ///
    /// Implementations must check `cancel` between items. Returning an error
    /// after some ids were sent aborts the response stream.
    async fn ids(&self, ids: mpsc::Sender<IdEntry>, cancel: CancellationToken) -> Result<(), ServiceError>;
}

/// Send one id unless the stream was cancelled or its consumer dropped.
///
/// Returns `false` when the producer should stop.
pub async fn send_id(ids: &mpsc::Sender<IdEntry>, cancel: &CancellationToken, entry: IdEntry) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        sent = ids.send(entry) => sent.is_ok(),
    }
}
