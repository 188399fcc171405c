//! Configuration schema definitions.
//!
//! Every section derives Serde traits and carries defaults, so an empty TOML
//! file (or no file at all) yields a runnable configuration.

use serde::{Deserialize, Serialize};

/// Root configuration shared by both workers.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FormRelayConfig {
    /// HTTP front-end settings.
    pub http: HttpConfig,

    /// Datagram relay settings.
    pub relay: RelayConfig,

    /// Document store settings.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP front-end configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Directory holding `index.html`, `message.html`, `error.html` and static assets.
    pub web_root: String,

    /// Maximum accepted form body in bytes.
    pub max_body_size: usize,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            web_root: "web".to_string(),
            max_body_size: 64 * 1024,
            request_timeout_secs: 30,
        }
    }
}

/// Datagram relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Address the relay binds and the front-end sends to.
    pub bind_address: String,

    /// Receive buffer size; longer datagrams are truncated by the transport.
    pub buffer_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            buffer_size: 1024,
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection string. `mongodb://` and `mongodb+srv://` select MongoDB,
    /// `memory://` selects the in-process store.
    pub uri: String,

    /// Database name.
    pub database: String,

    /// Collection receiving one document per message.
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "homework".to_string(),
            collection: "messages".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint of the HTTP worker.
    pub http_metrics_address: String,

    /// Metrics endpoint of the relay worker.
    pub relay_metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            http_metrics_address: "127.0.0.1:9090".to_string(),
            relay_metrics_address: "127.0.0.1:9091".to_string(),
        }
    }
}
