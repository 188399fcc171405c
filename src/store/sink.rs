//! Persistence sink: one scoped store connection per message.

use std::sync::Arc;

use crate::message::StoredMessage;
use crate::store::{DocumentStore, StoreError};

/// Appends stored messages to a fixed collection.
#[derive(Clone)]
pub struct PersistenceSink {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl PersistenceSink {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert `message` as a new document.
    ///
    /// The connection is closed whether or not the insert succeeds.
    pub async fn persist(&self, message: &StoredMessage) -> Result<(), StoreError> {
        let mut connection = self.store.connect().await?;
        let result = connection.insert_one(&self.collection, message).await;
        connection.close().await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodedFields;
    use crate::message::normalize;
    use crate::store::MemoryStore;

    fn message(text: &str) -> StoredMessage {
        let mut fields = DecodedFields::new();
        fields.insert("text".into(), text.into());
        normalize(fields, chrono::Local::now())
    }

    #[tokio::test]
    async fn appends_one_document_per_call() {
        let store = MemoryStore::new();
        let sink = PersistenceSink::new(Arc::new(store.clone()), "messages");

        let msg = message("same");
        sink.persist(&msg).await.unwrap();
        sink.persist(&msg).await.unwrap();

        assert_eq!(store.documents("messages").len(), 2);
        assert_eq!((store.opened(), store.closed()), (2, 2));
    }

    #[tokio::test]
    async fn releases_connection_when_write_fails() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let sink = PersistenceSink::new(Arc::new(store.clone()), "messages");

        let err = sink.persist(&message("lost")).await.unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
        assert_eq!(store.opened(), 1);
        assert_eq!(store.closed(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn connect_failure_opens_nothing() {
        let store = MemoryStore::new();
        store.fail_connect(true);
        let sink = PersistenceSink::new(Arc::new(store.clone()), "messages");

        assert!(matches!(
            sink.persist(&message("x")).await,
            Err(StoreError::Connect(_))
        ));
        assert_eq!((store.opened(), store.closed()), (0, 0));
    }
}
