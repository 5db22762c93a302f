//! Response construction helpers.
//!
//! Every JSON response goes through here so the content type is always set
//! before any body bytes.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

const APPLICATION_JSON: &str = "application/json";

/// `{"message": "<text>"}` with the text JSON-escaped.
pub fn message_body(message: &str) -> String {
    format!("{{\"message\": {}}}", serde_json::Value::String(message.to_string()))
}

/// A JSON message response.
pub fn json_message(status: StatusCode, message: &str) -> Response {
    json_body(status, message_body(message))
}

/// A response with a pre-encoded JSON body.
pub fn json_body(status: StatusCode, body: impl Into<Body>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))],
        body.into(),
    )
        .into_response()
}
