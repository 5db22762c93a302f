//! HTTP protocol translation subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → request.rs (transaction id: read X-Request-Id or mint one)
//!     → adapter.rs (decode body, call the collection's service)
//!     → error.rs (ServiceError → status + {"message": ...})
//!     → response.rs (JSON bodies, content type)
//!
//! GET /{collection}/__ids
//!     → ids.rs (producer task → bounded channel → NDJSON body)
//!
//! Operational endpoints (ops.rs): ping, build-info, health, gtg, api
//! ```
//!
//! # Design Decisions
//! - Services never see HTTP types; all classification happens here
//! - Every collection response echoes the transaction id
//! - Streaming errors abort the connection instead of faking a clean end

pub mod adapter;
pub mod error;
pub mod ids;
pub mod ops;
pub mod request;
pub mod response;
pub mod server;

pub use adapter::{AdapterSettings, MountedCollection, ResourceAdapter};
pub use error::ApiError;
pub use request::{MakeTransactionId, TransactionId, X_REQUEST_ID};
pub use server::AppServer;
