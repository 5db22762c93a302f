//! Request metrics.
//!
//! # Metrics
//! - `rw_requests_total` (counter): by collection, operation, status
//! - `rw_request_duration_seconds` (histogram): same labels
//!
//! # Design Decisions
//! - Adapters receive a `MetricsSink`; nothing records into a process-wide
//!   registry
//! - `PrometheusSink` owns its recorder and renders the text exposition

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tokio::net::TcpListener;

/// Collection operation, used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Write,
    Read,
    Delete,
    Count,
    Ids,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Write => "write",
            Operation::Read => "read",
            Operation::Delete => "delete",
            Operation::Count => "count",
            Operation::Ids => "ids",
        }
    }
}

/// Destination for request metrics.
pub trait MetricsSink: Send + Sync {
    fn record_request(&self, collection: &str, operation: Operation, status: u16, elapsed: Duration);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record_request(&self, _collection: &str, _operation: Operation, _status: u16, _elapsed: Duration) {}
}

/// Records into a private Prometheus recorder.
pub struct PrometheusSink {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl PrometheusSink {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        Self { recorder, handle }
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for PrometheusSink {
    fn record_request(&self, collection: &str, operation: Operation, status: u16, elapsed: Duration) {
        metrics::with_local_recorder(&self.recorder, || {
            metrics::counter!(
                "rw_requests_total",
                "collection" => collection.to_string(),
                "operation" => operation.as_str(),
                "status" => status.to_string()
            )
            .increment(1);
            metrics::histogram!(
                "rw_request_duration_seconds",
                "collection" => collection.to_string(),
                "operation" => operation.as_str(),
                "status" => status.to_string()
            )
            .record(elapsed.as_secs_f64());
        });
    }
}

/// Serve `GET /metrics` for `sink` on `addr` until `shutdown` resolves.
pub async fn serve_metrics(
    addr: SocketAddr,
    sink: Arc<PrometheusSink>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let sink = Arc::clone(&sink);
            async move { sink.render() }
        }),
    );

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}
