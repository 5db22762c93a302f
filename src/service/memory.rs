//! In-memory document store.
//!
//! Backs the collections mounted by the binary and doubles as a realistic
//! service in tests. Documents are JSON objects keyed by a configurable
//! identity field (`uuid` by default).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{send_id, Decoded, DecodeError, IdEntry, IdService, ResourceService, ServiceError};

/// A `DashMap`-backed collection of JSON documents.
#[derive(Debug)]
pub struct MemoryService {
    docs: DashMap<String, Value>,
    identity_field: String,
    available: AtomicBool,
}

impl MemoryService {
    pub fn new(identity_field: impl Into<String>) -> Self {
        Self {
            docs: DashMap::new(),
            identity_field: identity_field.into(),
            available: AtomicBool::new(true),
        }
    }

    /// Mark the store (un)reachable; checks and calls fail while unavailable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), ServiceError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ServiceError::unavailable("in-memory store is unavailable"))
        }
    }

    fn identity_of(&self, doc: &Value) -> Option<String> {
        doc.get(&self.identity_field)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

impl Default for MemoryService {
    fn default() -> Self {
        Self::new("uuid")
    }
}

#[async_trait]
impl ResourceService for MemoryService {
    type Resource = Value;

    fn decode_body(&self, body: &[u8]) -> Result<Decoded<Value>, DecodeError> {
        let doc: Value = serde_json::from_slice(body)?;
        if !doc.is_object() {
            return Err(DecodeError::Invalid("document must be a JSON object".to_string()));
        }
        let id = self
            .identity_of(&doc)
            .ok_or_else(|| DecodeError::MissingIdentity(self.identity_field.clone()))?;
        Ok(Decoded::new(doc, id))
    }

    async fn write(&self, resource: Value, transaction_id: &str) -> Result<(), ServiceError> {
        self.ensure_available()?;
        let id = self
            .identity_of(&resource)
            .ok_or_else(|| ServiceError::invalid(format!("missing identity field '{}'", self.identity_field)))?;
        tracing::debug!(transaction_id = %transaction_id, uuid = %id, "Storing document");
        self.docs.insert(id, resource);
        Ok(())
    }

    async fn read(&self, id: &str, transaction_id: &str) -> Result<Option<Value>, ServiceError> {
        self.ensure_available()?;
        tracing::debug!(transaction_id = %transaction_id, uuid = %id, "Reading document");
        Ok(self.docs.get(id).map(|r| r.value().clone()))
    }

    async fn delete(&self, id: &str, transaction_id: &str) -> Result<bool, ServiceError> {
        self.ensure_available()?;
        tracing::debug!(transaction_id = %transaction_id, uuid = %id, "Deleting document");
        Ok(self.docs.remove(id).is_some())
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        self.ensure_available()?;
        Ok(self.docs.len() as u64)
    }

    async fn check(&self) -> Result<(), ServiceError> {
        self.ensure_available()
    }

    fn id_service(self: Arc<Self>) -> Option<Arc<dyn IdService>> {
        Some(self as Arc<dyn IdService>)
    }
}

#[async_trait]
impl IdService for MemoryService {
    async fn ids(&self, ids: mpsc::Sender<IdEntry>, cancel: CancellationToken) -> Result<(), ServiceError> {
        self.ensure_available()?;
        // Snapshot keys so no shard lock is held across an await.
        let keys: Vec<String> = self.docs.iter().map(|r| r.key().clone()).collect();
        for key in keys {
            if !send_id(&ids, &cancel, IdEntry::new(key)).await {
                tracing::debug!("Id enumeration stopped early");
                break;
            }
        }
        Ok(())
    }
}
