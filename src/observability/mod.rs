//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and services produce:
//!     → logging.rs (structured tracing events, request spans)
//!     → metrics.rs (per-collection request counters and latencies)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → GET /metrics on the metrics listener (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The transaction id is a field on every request-scoped event
//! - Metrics go through an explicit `MetricsSink`, never a global recorder

pub mod logging;
pub mod metrics;
