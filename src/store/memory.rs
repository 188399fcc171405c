//! In-process document store.
//!
//! Keeps documents as JSON values and counts connection opens and closes, so
//! tests can check the scoped-connection contract. Writes (or connects) can be
//! forced to fail.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::message::StoredMessage;
use crate::store::{DocumentStore, StoreConnection, StoreError};

#[derive(Debug, Default)]
struct Inner {
    documents: Mutex<Vec<(String, Value)>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    fail_connect: AtomicBool,
    fail_writes: AtomicBool,
}

/// Shared in-memory store. Clones observe the same documents and counters.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `insert_one` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `connect` fail.
    pub fn fail_connect(&self, fail: bool) {
        self.inner.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Documents stored in `collection`, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Value> {
        self.inner
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(name, _)| name == collection)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    /// Total number of documents across collections.
    pub fn len(&self) -> usize {
        self.inner
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Connections handed out so far.
    pub fn opened(&self) -> usize {
        self.inner.opened.load(Ordering::SeqCst)
    }

    /// Connections released so far.
    pub fn closed(&self) -> usize {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn connect(&self) -> Result<Box<dyn StoreConnection>, StoreError> {
        if self.inner.fail_connect.load(Ordering::SeqCst) {
            return Err(StoreError::Connect("memory store refused connection".into()));
        }
        self.inner.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct MemoryConnection {
    inner: Arc<Inner>,
}

#[async_trait]
impl StoreConnection for MemoryConnection {
    async fn insert_one(&mut self, collection: &str, message: &StoredMessage) -> Result<(), StoreError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("memory store rejected write".into()));
        }
        let document = serde_json::to_value(message).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.inner
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((collection.to_string(), document));
        Ok(())
    }

    async fn close(self: Box<Self>) {
        self.inner.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodedFields;
    use crate::message::normalize;

    fn message() -> StoredMessage {
        let mut fields = DecodedFields::new();
        fields.insert("name".into(), "Bob".into());
        normalize(fields, chrono::Local::now())
    }

    #[tokio::test]
    async fn stores_documents_per_collection() {
        let store = MemoryStore::new();
        let mut connection = store.connect().await.unwrap();
        connection.insert_one("messages", &message()).await.unwrap();
        connection.insert_one("other", &message()).await.unwrap();
        connection.close().await;

        assert_eq!(store.len(), 2);
        assert_eq!(store.documents("messages").len(), 1);
        assert_eq!(store.documents("messages")[0]["name"], "Bob");
        assert_eq!((store.opened(), store.closed()), (1, 1));
    }

    #[tokio::test]
    async fn fault_switches() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let mut connection = store.connect().await.unwrap();
        assert!(matches!(
            connection.insert_one("messages", &message()).await,
            Err(StoreError::Write(_))
        ));
        connection.close().await;
        assert!(store.is_empty());

        store.fail_connect(true);
        assert!(matches!(store.connect().await, Err(StoreError::Connect(_))));
        assert_eq!(store.opened(), 1);
    }
}
