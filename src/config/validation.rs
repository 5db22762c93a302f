//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check collection names are unique and routable
//! - Validate addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::registry::check_collection_name;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("collection '{0}' is configured more than once")]
    DuplicateCollection(String),

    #[error("collection '{name}': {reason}")]
    InvalidCollection { name: String, reason: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "server.bind_address", &config.server.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("server.request_timeout_secs"));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("server.max_body_bytes"));
    }
    if config.streaming.id_buffer == 0 {
        errors.push(ValidationError::Zero("streaming.id_buffer"));
    }

    let mut seen = HashSet::new();
    for collection in &config.collections {
        if let Err(reason) = check_collection_name(&collection.name) {
            errors.push(ValidationError::InvalidCollection {
                name: collection.name.clone(),
                reason: reason.to_string(),
            });
        }
        if !seen.insert(collection.name.as_str()) {
            errors.push(ValidationError::DuplicateCollection(collection.name.clone()));
        }
        if collection.identity_field.is_empty() {
            errors.push(ValidationError::InvalidCollection {
                name: collection.name.clone(),
                reason: "identity_field must not be empty".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
