//! Operational endpoints: ping, build-info, health, good-to-go, api.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::health::{fail_fast_parallel_check, HealthReport};
use crate::http::adapter::MountedCollection;

/// State shared by the operational endpoints.
#[derive(Clone)]
pub struct OpsState {
    pub collections: Arc<[Arc<dyn MountedCollection>]>,
    pub service_name: String,
    pub description: String,
    pub api_doc: Option<Bytes>,
}

#[derive(Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
}

pub async fn ping() -> &'static str {
    "pong"
}

pub async fn build_info() -> Json<BuildInfo> {
    Json(BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Every collection's check, reported individually.
pub async fn health(State(ops): State<OpsState>) -> Json<HealthReport> {
    let report = HealthReport::run(&ops.service_name, &ops.description, &ops.collections[..]).await;
    if !report.ok {
        tracing::warn!(failing = report.failing().count(), "Health check reported failures");
    }
    Json(report)
}

/// Aggregate readiness: `200 OK` or `503` with the first failure seen.
pub async fn good_to_go(State(ops): State<OpsState>) -> Response {
    let status = fail_fast_parallel_check(&ops.collections[..]).await;
    if status.good_to_go {
        return (StatusCode::OK, "OK").into_response();
    }

    let message = status.message.unwrap_or_default();
    tracing::warn!(message = %message, "Not good to go");
    (StatusCode::SERVICE_UNAVAILABLE, message).into_response()
}

/// The configured API description, or 404 when there is none.
pub async fn api(State(ops): State<OpsState>) -> Response {
    match ops.api_doc {
        Some(doc) if !doc.is_empty() => (
            [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
            doc,
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
