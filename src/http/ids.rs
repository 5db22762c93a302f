//! Streaming identifier enumeration.
//!
//! # Data Flow
//! ```text
//! IdService::ids (spawned task)
//!     → mpsc::channel(id_buffer)  (backpressure when full)
//!     → IdStream::next_chunk      (one JSON value + '\n' per id)
//!     → chunked response body
//!
//! producer error or panic → oneshot → body stream yields Err → connection aborted
//! body dropped (end, error, disconnect) → DropGuard cancels the producer
//! ```
//!
//! # Design Decisions
//! - The status line is committed as 200 before the first id, so a later
//!   failure can only be signalled by truncating the stream
//! - Producer errors win over ids still buffered in the channel
//! - Cancellation happens exactly once, when the body stream is dropped

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::http::request::TransactionId;
use crate::service::{IdEntry, IdService, ServiceError};

/// Default capacity of the id channel.
pub const DEFAULT_ID_BUFFER: usize = 4096;

/// Reasons an id stream ends early.
#[derive(Debug, Error)]
pub enum IdStreamError {
    #[error("id enumeration failed: {0}")]
    Producer(#[source] ServiceError),

    #[error("failed to encode id: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Start the producer and return a streaming NDJSON response.
pub fn stream_ids(
    producer: Arc<dyn IdService>,
    buffer: usize,
    collection: String,
    transaction_id: TransactionId,
) -> Response {
    let (ids_tx, ids_rx) = mpsc::channel(buffer.max(1));
    let (errs_tx, errs_rx) = oneshot::channel();
    let cancel = CancellationToken::new();
    let producer_cancel = cancel.clone();

    let task = tokio::spawn(async move { producer.ids(ids_tx, producer_cancel).await });
    tokio::spawn(async move {
        let err = match task.await {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err,
            // A panicking producer must still abort the body.
            Err(join) => ServiceError::Other(format!("id producer stopped: {join}").into()),
        };
        let _ = errs_tx.send(err);
    });

    tracing::debug!(collection = %collection, transaction_id = %transaction_id, "Streaming ids");

    let stream = IdStream {
        ids: ids_rx,
        errs: Some(errs_rx),
        finished: false,
        collection,
        transaction_id,
        _cancel: cancel.drop_guard(),
    };
    let body = Body::from_stream(futures_util::stream::unfold(stream, IdStream::next_chunk));

    (
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}

enum Next {
    Entry(Option<IdEntry>),
    ProducerDone(Result<ServiceError, oneshot::error::RecvError>),
}

/// Consumer side of an enumeration; owns the cancellation guard.
struct IdStream {
    ids: mpsc::Receiver<IdEntry>,
    /// `None` once the producer's outcome has been observed.
    errs: Option<oneshot::Receiver<ServiceError>>,
    finished: bool,
    collection: String,
    transaction_id: TransactionId,
    _cancel: DropGuard,
}

impl IdStream {
    async fn next_chunk(mut self) -> Option<(Result<Bytes, IdStreamError>, Self)> {
        if self.finished {
            return None;
        }

        loop {
            let next = match self.errs.as_mut() {
                Some(errs) => tokio::select! {
                    biased;
                    outcome = errs => Next::ProducerDone(outcome),
                    entry = self.ids.recv() => Next::Entry(entry),
                },
                None => Next::Entry(self.ids.recv().await),
            };

            match next {
                Next::Entry(Some(entry)) => {
                    let chunk = encode(&entry);
                    if chunk.is_err() {
                        self.finished = true;
                    }
                    return Some((chunk, self));
                }
                Next::Entry(None) => {
                    // Channel closed; the outcome decides between a clean end and an abort.
                    let outcome = match self.errs.take() {
                        Some(errs) => errs.await,
                        None => return None,
                    };
                    return match outcome {
                        Ok(err) => Some(self.fail(err)),
                        Err(_) => None,
                    };
                }
                Next::ProducerDone(Ok(err)) => {
                    self.errs = None;
                    return Some(self.fail(err));
                }
                Next::ProducerDone(Err(_)) => {
                    // Producer finished cleanly; drain what is left.
                    self.errs = None;
                }
            }
        }
    }

    fn fail(mut self, err: ServiceError) -> (Result<Bytes, IdStreamError>, Self) {
        tracing::error!(
            collection = %self.collection,
            transaction_id = %self.transaction_id,
            error = %err,
            "Id enumeration failed after response started; closing connection"
        );
        self.finished = true;
        (Err(IdStreamError::Producer(err)), self)
    }
}

fn encode(entry: &IdEntry) -> Result<Bytes, IdStreamError> {
    let mut buf = serde_json::to_vec(entry)?;
    buf.push(b'\n');
    Ok(Bytes::from(buf))
}
