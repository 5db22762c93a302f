//! Service failure classification.
//!
//! # Precedence (first match wins)
//! 1. `NoContent`      → 204, empty body (message only logged)
//! 2. `Conflict`       → 409
//! 3. `InvalidRequest` → 400
//! 4. anything else    → 503
//!
//! Bodies are always `{"message": "<text>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::http::response::json_message;
use crate::service::ServiceError;

/// Status code for a service failure.
pub fn classify(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::NoContent(_) => StatusCode::NO_CONTENT,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ServiceError::Unavailable(_) | ServiceError::Other(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// An HTTP-level failure: status plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::new(classify(&err), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status == StatusCode::NO_CONTENT {
            tracing::debug!(message = %self.message, "No content returned");
            return StatusCode::NO_CONTENT.into_response();
        }
        json_message(self.status, &self.message)
    }
}
