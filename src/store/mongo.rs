//! MongoDB-backed document store.

use async_trait::async_trait;
use mongodb::bson::{self, Document};
use mongodb::{Client, Database};

use crate::config::StoreConfig;
use crate::message::StoredMessage;
use crate::store::{DocumentStore, StoreConnection, StoreError};

/// Creates one MongoDB client per connection request.
#[derive(Debug, Clone)]
pub struct MongoStore {
    uri: String,
    database: String,
}

impl MongoStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            uri: config.uri.clone(),
            database: config.database.clone(),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn connect(&self) -> Result<Box<dyn StoreConnection>, StoreError> {
        // The driver connects lazily; an unreachable server surfaces on the
        // first write.
        let client = Client::with_uri_str(&self.uri)
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;
        let database = client.database(&self.database);
        Ok(Box::new(MongoConnection { client, database }))
    }
}

struct MongoConnection {
    client: Client,
    database: Database,
}

#[async_trait]
impl StoreConnection for MongoConnection {
    async fn insert_one(&mut self, collection: &str, message: &StoredMessage) -> Result<(), StoreError> {
        let document = bson::to_document(message).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.database
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }

    async fn close(self: Box<Self>) {
        let MongoConnection { client, .. } = *self;
        client.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_message_maps_to_flat_bson() {
        let mut fields = crate::codec::DecodedFields::new();
        fields.insert("name".into(), "Alice".into());
        let message = crate::message::normalize(fields, chrono::Local::now());

        let document = bson::to_document(&message).unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document.get_str("name").unwrap(), "Alice");
        assert_eq!(document.get_str("date").unwrap(), message.date());
    }

    #[tokio::test]
    async fn rejects_malformed_connection_string() {
        let config = StoreConfig {
            uri: "localhost:27017".into(),
            ..StoreConfig::default()
        };
        let store = MongoStore::new(&config);
        assert!(matches!(store.connect().await, Err(StoreError::Connect(_))));
    }
}
