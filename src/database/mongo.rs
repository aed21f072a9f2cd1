use std::sync::Arc;

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Client, Collection};

use super::*;

/// Connects to MongoDB using a connection string.
pub struct MongoConnector {
    uri: String,
}

impl MongoConnector {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

#[rocket::async_trait]
impl Connector for MongoConnector {
    async fn connect(&self) -> Result<SharedStore, StoreError> {
        // Building a client does not touch the network, so ping to make sure
        // the deployment is actually reachable.
        let client = Client::with_uri_str(&self.uri).await?;
        client.database("admin").run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = DATABASE_NAME, "connected to the database");

        let collection = client
            .database(DATABASE_NAME)
            .collection::<ScoreRecord>(COLLECTION_NAME);
        Ok(Arc::new(MongoScores::new(collection)))
    }
}

/// The `gameDB.scores` collection.
pub struct MongoScores {
    collection: Collection<ScoreRecord>,
}

impl MongoScores {
    pub fn new(collection: Collection<ScoreRecord>) -> Self {
        Self { collection }
    }
}

#[rocket::async_trait]
impl ScoreStore for MongoScores {
    async fn insert_one(&self, record: &ScoreRecord) -> Result<(), StoreError> {
        self.collection.insert_one(record).await?;
        Ok(())
    }

    async fn top_scores(&self, limit: i64) -> Result<Vec<ScoreRecord>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "score": -1 })
            .limit(limit)
            .await?;
        let records = cursor.try_collect().await?;
        Ok(records)
    }
}
