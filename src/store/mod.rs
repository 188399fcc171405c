//! Document store subsystem.
//!
//! # Data Flow
//! ```text
//! StoredMessage
//!     → sink.rs (acquire connection, insert, release)
//!     → DocumentStore::connect → StoreConnection::insert_one → close
//!     → mongo.rs (MongoDB) | memory.rs (in-process)
//! ```
//!
//! # Design Decisions
//! - One connection per write, always closed, never pooled
//! - Append only: no reads, no upserts
//! - Backend chosen by connection string scheme

pub mod memory;
pub mod mongo;
pub mod sink;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StoreConfig;
use crate::message::StoredMessage;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use sink::PersistenceSink;

/// Failures talking to the document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to store: {0}")]
    Connect(String),

    #[error("failed to write document: {0}")]
    Write(String),

    #[error("failed to encode document: {0}")]
    Serialize(String),
}

/// Opens connections to a document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open a fresh connection. The caller must [`StoreConnection::close`] it.
    async fn connect(&self) -> Result<Box<dyn StoreConnection>, StoreError>;
}

/// A single open store connection.
#[async_trait]
pub trait StoreConnection: Send {
    /// Append `message` as a new document in `collection`.
    async fn insert_one(&mut self, collection: &str, message: &StoredMessage) -> Result<(), StoreError>;

    /// Release the connection.
    async fn close(self: Box<Self>);
}

/// Build the store named by `config.uri`.
pub fn open_store(config: &StoreConfig) -> Arc<dyn DocumentStore> {
    if config.uri.starts_with("memory://") {
        tracing::warn!("Using in-process memory store; documents are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(MongoStore::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_scheme_selects_memory_store() {
        let config = StoreConfig {
            uri: "memory://".into(),
            ..StoreConfig::default()
        };
        let store = open_store(&config);
        let connection = store.connect().await.unwrap();
        connection.close().await;
    }
}
