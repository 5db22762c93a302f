//! Read-write resource service (v1)
//!
//! Serves the configured collections from in-memory stores.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!   Client Request       │  ┌────────────┐   ┌──────────┐   ┌─────────┐ │
//!   ─────────────────────┼─▶│ middleware │──▶│ routing  │──▶│ adapter │ │
//!                        │  │ request id │   │ /{c}/... │   │ (http)  │ │
//!                        │  │ trace      │   └────┬─────┘   └────┬────┘ │
//!                        │  └────────────┘        │              │      │
//!                        │                  ┌─────▼─────┐  ┌─────▼────┐ │
//!   Client Response      │                  │  health   │  │ service  │ │
//!   ◀────────────────────┼──────────────────│ gtg/report│  │ (memory) │ │
//!                        │                  └───────────┘  └──────────┘ │
//!                        │   config · lifecycle · observability         │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use clap::Parser;
use tokio::net::TcpListener;

use rw_app::config::{load_config, AppConfig};
use rw_app::http::adapter::AdapterSettings;
use rw_app::lifecycle::{initialise_collections, signals, Shutdown, StartupError};
use rw_app::observability::logging::init_logging;
use rw_app::observability::metrics::{serve_metrics, MetricsSink, NoopSink, PrometheusSink};
use rw_app::service::MemoryService;
use rw_app::{router, AppServer, CollectionRegistry, RouterOptions};

#[derive(Parser)]
#[command(name = "rw-app")]
#[command(about = "Read-write HTTP adapter for resource collections", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "RW_APP_CONFIG")]
    config: Option<PathBuf>,

    /// Override server.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override observability.log_level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    init_logging(&config.observability)?;

    tracing::info!("rw-app v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        env = %config.server.env,
        collections = config.collections.len(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();

    let metrics: Arc<dyn MetricsSink> = if config.observability.metrics_enabled {
        let sink = Arc::new(PrometheusSink::new());
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        let server_sink = Arc::clone(&sink);
        let signalled = shutdown.signalled();
        tokio::spawn(async move {
            if let Err(e) = serve_metrics(addr, server_sink, signalled).await {
                tracing::error!(error = %e, "Metrics endpoint failed");
            }
        });
        sink
    } else {
        Arc::new(NoopSink)
    };

    let mut registry = CollectionRegistry::new(AdapterSettings {
        id_buffer: config.streaming.id_buffer,
        max_body_bytes: config.server.max_body_bytes,
        metrics,
    });
    for collection in &config.collections {
        registry.mount(
            collection.name.clone(),
            Arc::new(MemoryService::new(collection.identity_field.clone())),
        )?;
    }

    initialise_collections(&registry).await?;

    let api_doc = match &config.api_doc_path {
        Some(path) => Some(Bytes::from(tokio::fs::read(path).await?)),
        None => None,
    };

    let routes = router(
        &registry,
        RouterOptions {
            service_name: config.server.service_name.clone(),
            description: config.server.description.clone(),
            api_doc,
        },
    );
    let server = AppServer::new(&config.server, routes);

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.server.bind_address.clone(),
            source,
        })?;

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    server.run(listener, shutdown.signalled()).await?;

    tracing::info!(service = %config.server.service_name, "Shutdown complete");
    Ok(())
}
