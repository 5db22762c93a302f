//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use rw_app::service::{send_id, DecodeError, Decoded, IdEntry, IdService, ResourceService, ServiceError};
use rw_app::{router, CollectionRegistry, RouterOptions};

/// A scripted service. Behaviour is driven by flags in the written document,
/// e.g. `{"uuid": "1", "failWrite": true}`, or by the `fail_*` switches.
#[derive(Default)]
pub struct DummyService {
    pub fail_read: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_count: AtomicBool,
    pub fail_check: AtomicBool,
    /// Ids served by `/__ids`; `None` means enumeration is unsupported.
    pub ids: Option<Vec<String>>,
    /// Fail enumeration after this many ids were sent.
    pub fail_ids_after: Option<usize>,
    /// Panic during enumeration after this many ids were sent.
    pub panic_ids_after: Option<usize>,
    pub transaction_ids: Mutex<Vec<String>>,
    pub cancellations: Arc<AtomicUsize>,
}

impl DummyService {
    pub fn with_ids(ids: Vec<String>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn seen_transaction_ids(&self) -> Vec<String> {
        self.transaction_ids.lock().unwrap().clone()
    }

    fn remember(&self, tid: &str) {
        self.transaction_ids.lock().unwrap().push(tid.to_string());
    }
}

fn flag(doc: &Value, name: &str) -> bool {
    doc.get(name).and_then(Value::as_bool).unwrap_or(false)
}

#[async_trait]
impl ResourceService for DummyService {
    type Resource = Value;

    fn decode_body(&self, body: &[u8]) -> Result<Decoded<Value>, DecodeError> {
        let doc: Value = serde_json::from_slice(body)?;
        if flag(&doc, "failParse") {
            return Err(DecodeError::Invalid("TEST failing to DECODE".to_string()));
        }
        let id = doc
            .get("uuid")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::MissingIdentity("uuid".to_string()))?
            .to_string();
        Ok(Decoded::new(doc, id))
    }

    async fn write(&self, resource: Value, transaction_id: &str) -> Result<(), ServiceError> {
        self.remember(transaction_id);
        if flag(&resource, "failWrite") {
            return Err(ServiceError::Other("TEST failing to WRITE".into()));
        }
        if flag(&resource, "failConflict") {
            return Err(ServiceError::conflict("TEST failing to WRITE due to CONFLICT"));
        }
        if flag(&resource, "failInvalid") {
            return Err(ServiceError::invalid("TEST invalid document"));
        }
        if flag(&resource, "failUnavailable") {
            return Err(ServiceError::unavailable("TEST store unavailable"));
        }
        if flag(&resource, "noContent") {
            return Err(ServiceError::no_content("TEST nothing to write"));
        }
        Ok(())
    }

    async fn read(&self, id: &str, transaction_id: &str) -> Result<Option<Value>, ServiceError> {
        self.remember(transaction_id);
        if self.fail_read.load(Ordering::SeqCst) {
            return Err(ServiceError::Other("TEST failing to READ".into()));
        }
        match id {
            "missing" => Ok(None),
            _ => Ok(Some(serde_json::json!({ "uuid": id, "name": "dummy" }))),
        }
    }

    async fn delete(&self, id: &str, transaction_id: &str) -> Result<bool, ServiceError> {
        self.remember(transaction_id);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ServiceError::unavailable("TEST failing to DELETE"));
        }
        Ok(id != "missing")
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(ServiceError::Other("TEST failing to COUNT".into()));
        }
        Ok(2)
    }

    async fn check(&self) -> Result<(), ServiceError> {
        if self.fail_check.load(Ordering::SeqCst) {
            return Err(ServiceError::unavailable("TEST failing to CHECK"));
        }
        Ok(())
    }

    fn id_service(self: Arc<Self>) -> Option<Arc<dyn IdService>> {
        if self.ids.is_some() {
            Some(self as Arc<dyn IdService>)
        } else {
            None
        }
    }
}

#[async_trait]
impl IdService for DummyService {
    async fn ids(&self, ids: mpsc::Sender<IdEntry>, cancel: CancellationToken) -> Result<(), ServiceError> {
        let counter = Arc::clone(&self.cancellations);
        let watcher = cancel.clone();
        tokio::spawn(async move {
            watcher.cancelled().await;
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for (sent, id) in self.ids.iter().flatten().enumerate() {
            if self.panic_ids_after == Some(sent) {
                panic!("TEST panicking while listing ids");
            }
            if self.fail_ids_after == Some(sent) {
                return Err(ServiceError::unavailable("TEST failing to LIST ids"));
            }
            if !send_id(&ids, &cancel, IdEntry::new(id.clone())).await {
                return Ok(());
            }
        }
        Ok(())
    }
}

/// Router with `service` mounted at `/things`.
pub fn app_with<S: ResourceService>(service: Arc<S>) -> Router {
    let mut registry = CollectionRegistry::default();
    registry.mount("things", service).unwrap();
    router(&registry, RouterOptions::default())
}

pub fn request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn status_and_body(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let response = send(app, req).await;
    let status = response.status();
    (status, body_string(response).await)
}
