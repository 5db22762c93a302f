//! Liveness aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! GET /__gtg:
//!     every collection's check() in parallel
//!     → gtg.rs (first failure wins, rest dropped)
//!     → 200 "OK" | 503 "<message>"
//!
//! GET /__health:
//!     every collection's check() in parallel
//!     → report.rs (one entry per collection)
//!     → JSON diagnostic report
//! ```
//!
//! # Design Decisions
//! - Recomputed on every request, never cached
//! - Checks are assumed read-only, so no ordering between them
//! - Which failure surfaces first is not deterministic

pub mod gtg;
pub mod report;

pub use gtg::{fail_fast_parallel_check, Status, StatusChecker};
pub use report::{CheckResult, HealthReport};
