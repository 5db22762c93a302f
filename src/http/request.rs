//! Transaction id extraction and minting.
//!
//! # Responsibilities
//! - Read the caller's `X-Request-Id` when present
//! - Mint `tid_` + 10 random letters otherwise
//! - Plug into `tower_http::request_id` so the id is set before routing
//!
//! # Design Decisions
//! - The id lives for one request and is never stored
//! - Handlers extract it themselves, so routers work without the layer

use std::convert::Infallible;
use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

/// Header carrying the transaction id, in and out.
pub const X_REQUEST_ID: &str = "x-request-id";

const TID_PREFIX: &str = "tid_";
const TID_RANDOM_LEN: usize = 10;

/// Per-request correlation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionId(String);

impl TransactionId {
    /// Mint a fresh id.
    pub fn mint() -> Self {
        let suffix: String = (0..TID_RANDOM_LEN).map(|_| fastrand::alphabetic()).collect();
        Self(format!("{TID_PREFIX}{suffix}"))
    }

    /// Use the request's id, minting one if it is absent or unreadable.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(Self::mint)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as a response header value.
    pub fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0).ok()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for TransactionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// `MakeRequestId` that mints transaction ids for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTransactionId;

impl MakeRequestId for MakeTransactionId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        TransactionId::mint().header_value().map(RequestId::new)
    }
}
