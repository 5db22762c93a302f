//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener and request handling.
    pub server: ServerConfig,

    /// Collections to mount, one URL prefix each.
    pub collections: Vec<CollectionConfig>,

    /// Id enumeration settings.
    pub streaming: StreamingConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Optional API description served at `/__api`.
    pub api_doc_path: Option<String>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Name reported by the health endpoint.
    pub service_name: String,

    /// Description reported by the health endpoint.
    pub description: String,

    /// Deployment label (e.g. "local" or "prod"). Informational only: it is
    /// reported in the startup log and changes no behaviour.
    pub env: String,

    /// Log every request through the trace layer.
    pub enable_request_log: bool,

    /// Time allowed to produce a response head, in seconds.
    pub request_timeout_secs: u64,

    /// Largest accepted PUT body after decompression.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            service_name: "rw-app".to_string(),
            description: "Read-write resource service".to_string(),
            env: "local".to_string(),
            enable_request_log: true,
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// A mounted collection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionConfig {
    /// URL path segment, e.g. "people" for `/people/{id}`.
    pub name: String,

    /// JSON field holding each document's identifier.
    #[serde(default = "default_identity_field")]
    pub identity_field: String,
}

fn default_identity_field() -> String {
    "uuid".to_string()
}

/// Id enumeration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// How far a producer may run ahead of the client.
    pub id_buffer: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self { id_buffer: 4096 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
