//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     (name, service) pairs
//!     → registry.rs (validate names, erase service types)
//!     → router.rs (nest each collection under /{name}, add fixed paths)
//!     → immutable axum Router
//!
//! Request:
//!     method + path → collection adapter | operational endpoint
//! ```
//!
//! # Design Decisions
//! - Pure routing, no business logic
//! - Built without a socket so tests can call it directly
//! - One collection per prefix; fixed paths cannot be shadowed

pub mod registry;
pub mod router;

pub use registry::{CollectionRegistry, RegistryError};
pub use router::{router, RouterOptions};
