//! UDP relay listener.
//!
//! # Responsibilities
//! - Bind the datagram socket the front-end sends to
//! - Receive one datagram at a time, in arrival order
//! - Drive decode → normalize → persist and log the outcome
//! - Survive decode and store failures; stop on socket failure or shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tokio::net::UdpSocket;
use tokio::sync::broadcast;

use crate::codec::{decode, DecodeError};
use crate::config::{FormRelayConfig, RelayConfig};
use crate::message::{normalize_now, StoredMessage};
use crate::observability::metrics;
use crate::store::{open_store, PersistenceSink, StoreError};

/// Fatal relay errors.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Failed to bind the datagram socket.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    /// Receiving from the bound socket failed.
    #[error("Socket error: {0}")]
    Socket(#[from] std::io::Error),
}

/// Per-datagram failures. Logged and dropped; the loop continues.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Parse error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to save: {0}")]
    Store(#[from] StoreError),
}

impl ProcessError {
    fn outcome(&self) -> &'static str {
        match self {
            ProcessError::Decode(_) => "decode_error",
            ProcessError::Store(_) => "store_error",
        }
    }
}

/// The relay worker: a bound socket plus the persistence pipeline.
pub struct RelayListener {
    socket: UdpSocket,
    buffer_size: usize,
    sink: PersistenceSink,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl RelayListener {
    /// Bind the configured address.
    pub async fn bind(
        config: &RelayConfig,
        sink: PersistenceSink,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self, RelayError> {
        let bind_error = |source: std::io::Error| RelayError::Bind {
            address: config.bind_address.clone(),
            source,
        };

        let addr: SocketAddr = config
            .bind_address
            .parse()
            .map_err(|e| bind_error(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;
        let socket = UdpSocket::bind(addr).await.map_err(bind_error)?;

        tracing::info!(
            address = %socket.local_addr()?,
            buffer_size = config.buffer_size,
            collection = sink.collection(),
            "Relay socket bound"
        );

        Ok(Self {
            socket,
            buffer_size: config.buffer_size,
            sink,
            clock,
        })
    }

    /// Bind using the store and relay sections of a full configuration.
    pub async fn from_config(config: &FormRelayConfig) -> Result<Self, RelayError> {
        let sink = PersistenceSink::new(open_store(&config.store), config.store.collection.clone());
        Self::bind(&config.relay, sink, Arc::new(DefaultClock)).await
    }

    /// Local address of the bound socket.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.socket.local_addr()
    }

    /// Serve until shutdown or a socket failure. The socket is released on return.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), RelayError> {
        tracing::info!(address = %self.local_addr()?, "Relay listening");

        let mut buf = vec![0u8; self.buffer_size];
        let result = loop {
            tokio::select! {
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok((len, peer)) => self.on_datagram(&buf[..len], peer).await,
                    Err(e) => {
                        tracing::error!(error = %e, "Relay socket error");
                        break Err(RelayError::Socket(e));
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Relay received shutdown signal");
                    break Ok(());
                }
            }
        };

        tracing::info!("Relay stopped");
        result
    }

    async fn on_datagram(&self, payload: &[u8], peer: SocketAddr) {
        tracing::info!(
            peer = %peer,
            payload = %String::from_utf8_lossy(payload),
            "Received datagram"
        );
        if payload.len() == self.buffer_size {
            tracing::debug!(peer = %peer, buffer_size = self.buffer_size, "Datagram filled the buffer and may be truncated");
        }

        match self.handle_datagram(payload).await {
            Ok(message) => {
                metrics::record_datagram("stored");
                let document = serde_json::to_string(&message).unwrap_or_default();
                tracing::info!(document = %document, "Saved message");
            }
            Err(e) => {
                metrics::record_datagram(e.outcome());
                tracing::error!(peer = %peer, error = %e, "Dropped datagram");
            }
        }
    }

    /// Decode, timestamp and persist one payload.
    pub async fn handle_datagram(&self, payload: &[u8]) -> Result<StoredMessage, ProcessError> {
        let fields = decode(payload)?;
        let message = normalize_now(fields, self.clock.as_ref());
        self.sink.persist(&message).await?;
        Ok(message)
    }
}
