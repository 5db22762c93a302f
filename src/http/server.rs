//! HTTP server setup.
//!
//! # Responsibilities
//! - Wrap the collection router with middleware (request id, tracing, timeout)
//! - Bind the router to a listener
//! - Drain in-flight requests on shutdown

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, Request, StatusCode};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::request::{MakeTransactionId, X_REQUEST_ID};

/// HTTP server for the mounted collections.
pub struct AppServer {
    router: Router,
}

impl AppServer {
    /// Wrap `routes` (see `routing::router`) with the server middleware.
    pub fn new(config: &ServerConfig, routes: Router) -> Self {
        Self {
            router: Self::build_router(config, routes),
        }
    }

    /// Build the middleware stack around the dispatcher.
    fn build_router(config: &ServerConfig, routes: Router) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        // The timeout covers producing the response head; streamed bodies run on.
        let mut app = routes.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ));

        if config.enable_request_log {
            app = app.layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let transaction_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    transaction_id = %transaction_id,
                )
            }));
        }

        app.layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetRequestIdLayer::new(request_id, MakeTransactionId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
