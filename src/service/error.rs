//! Service-level error taxonomy.
//!
//! Services report outcomes with these variants only. Mapping them to HTTP
//! status codes is the adapter's job (see `http::error`).

use thiserror::Error;

/// Failures a resource service can report.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The operation succeeded but there is nothing to return.
    #[error("{0}")]
    NoContent(String),

    /// A uniqueness constraint or concurrent transaction conflicted.
    #[error("{0}")]
    Conflict(String),

    /// The request violated a domain rule.
    #[error("{0}")]
    InvalidRequest(String),

    /// Storage is unreachable or temporarily failing.
    #[error("{0}")]
    Unavailable(String),

    /// Anything the service could not classify.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ServiceError {
    pub fn no_content(msg: impl Into<String>) -> Self {
        Self::NoContent(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Failure to turn a request body into a resource.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("missing identity field '{0}'")]
    MissingIdentity(String),

    #[error("{0}")]
    Invalid(String),
}
