//! Router assembly.

use std::sync::Arc;

use axum::body::Bytes;
use axum::routing::get;
use axum::Router;

use crate::http::adapter::MountedCollection;
use crate::http::ops::{self, OpsState};
use crate::routing::registry::CollectionRegistry;

/// What the operational endpoints report about this process.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub service_name: String,
    pub description: String,
    /// Body for `/__api`; `None` or empty answers 404.
    pub api_doc: Option<Bytes>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            description: String::new(),
            api_doc: None,
        }
    }
}

/// Build the dispatcher for every mounted collection plus the fixed paths.
///
/// No middleware and no socket: callers add layers and serve it.
pub fn router(registry: &CollectionRegistry, options: RouterOptions) -> Router {
    let collections: Arc<[Arc<dyn MountedCollection>]> = registry.iter().cloned().collect();

    let ops_state = OpsState {
        collections: Arc::clone(&collections),
        service_name: options.service_name,
        description: options.description,
        api_doc: options.api_doc,
    };

    let mut app = Router::new()
        .route("/ping", get(ops::ping))
        .route("/__ping", get(ops::ping))
        .route("/build-info", get(ops::build_info))
        .route("/__build-info", get(ops::build_info))
        .route("/__health", get(ops::health))
        .route("/__gtg", get(ops::good_to_go))
        .route("/__api", get(ops::api))
        .with_state(ops_state);

    for collection in collections.iter() {
        let prefix = format!("/{}", collection.name());
        app = app.nest(&prefix, Arc::clone(collection).routes());
    }
    app
}
