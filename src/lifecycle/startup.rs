//! Worker startup.
//!
//! # Responsibilities
//! - Install the worker's metrics endpoint when enabled
//! - Bind the worker's socket (TCP for http, UDP for relay)
//! - Run the serve loop until shutdown, inside a span naming the role
//!
//! # Design Decisions
//! - Fail fast: a bind error is fatal to the worker
//! - Each role runs in its own process; nothing here is shared between roles

use std::net::SocketAddr;

use tracing::Instrument;

use crate::config::FormRelayConfig;
use crate::http::{FrontendError, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::relay::{RelayError, RelayListener};

/// A worker process role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Http,
    Relay,
}

impl Role {
    /// Command-line argument selecting this role.
    pub fn as_arg(self) -> &'static str {
        match self {
            Role::Http => "http",
            Role::Relay => "relay",
        }
    }

    /// Process name used in logs.
    pub fn process_name(self) -> &'static str {
        match self {
            Role::Http => "http_server",
            Role::Relay => "socket_server",
        }
    }

    fn metrics_address(self, config: &FormRelayConfig) -> &str {
        match self {
            Role::Http => &config.observability.http_metrics_address,
            Role::Relay => &config.observability.relay_metrics_address,
        }
    }
}

/// Fatal worker errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error(transparent)]
    Frontend(#[from] FrontendError),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Run `role` until a shutdown signal or a fatal error.
pub async fn run_worker(role: Role, config: &FormRelayConfig) -> Result<(), WorkerError> {
    let span = tracing::info_span!("worker", process = role.process_name());
    async {
        if config.observability.metrics_enabled {
            match role.metrics_address(config).parse::<SocketAddr>() {
                Ok(addr) => metrics::init_metrics(addr),
                Err(e) => tracing::error!(error = %e, "Invalid metrics address"),
            }
        }

        let shutdown = Shutdown::new();
        shutdown.trigger_on_signal();

        let result = match role {
            Role::Http => run_http(config, &shutdown).await,
            Role::Relay => run_relay(config, &shutdown).await,
        };
        if let Err(e) = &result {
            tracing::error!(error = %e, "Worker failed");
        }
        tracing::info!("Server stopped");
        result
    }
    .instrument(span)
    .await
}

async fn run_http(config: &FormRelayConfig, shutdown: &Shutdown) -> Result<(), WorkerError> {
    let server = HttpServer::new(config)?;
    let listener = server.bind().await?;
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}

async fn run_relay(config: &FormRelayConfig, shutdown: &Shutdown) -> Result<(), WorkerError> {
    let relay = RelayListener::from_config(config).await?;
    relay.run(shutdown.subscribe()).await?;
    Ok(())
}
