//! Startup orchestration.

use thiserror::Error;

use crate::routing::CollectionRegistry;
use crate::service::ServiceError;

/// Fatal errors before the server accepts traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("service for path {collection} could not start up: {source}")]
    Initialise {
        collection: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Initialise every mounted collection, stopping at the first failure.
pub async fn initialise_collections(registry: &CollectionRegistry) -> Result<(), StartupError> {
    for (name, collection) in registry.names().zip(registry.iter()) {
        collection
            .initialise()
            .await
            .map_err(|source| StartupError::Initialise {
                collection: name.to_string(),
                source,
            })?;
        tracing::info!(collection = %name, "Collection initialised");
    }
    Ok(())
}
