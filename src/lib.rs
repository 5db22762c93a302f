//! Read-write resource service adapter.
//!
//! Exposes any number of named collections, each backed by a
//! [`service::ResourceService`], over HTTP:
//!
//! ```text
//! PUT    /{collection}/{id}     write
//! GET    /{collection}/{id}     read
//! DELETE /{collection}/{id}     delete
//! GET    /{collection}/__count  count
//! GET    /{collection}/__ids    streamed id enumeration
//! GET    /__gtg /__health /__ping /__build-info /__api
//! ```

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod service;

pub use config::AppConfig;
pub use http::AppServer;
pub use lifecycle::Shutdown;
pub use routing::{router, CollectionRegistry, RouterOptions};
pub use service::{IdService, ResourceService, ServiceError};
