use std::sync::Arc;

mod connection;
#[cfg(test)]
pub mod memory;
mod mongo;
mod request_error;
pub mod requests;
mod score;

pub use connection::{ConnectionManager, Connector};
pub use mongo::MongoConnector;
pub use request_error::*;
pub use score::{ScoreRecord, ScoreSubmission};

pub const DATABASE_NAME: &str = "gameDB";
pub const COLLECTION_NAME: &str = "scores";

/// Maximum number of records returned by `GET /ranking`.
pub const RANKING_LIMIT: i64 = 20;

/// Handle to the `scores` collection, shared by every request.
pub type SharedStore = Arc<dyn ScoreStore>;

/// Operations the service performs against the `scores` collection.
#[rocket::async_trait]
pub trait ScoreStore: Send + Sync {
    /// Persists a single new record.
    async fn insert_one(&self, record: &ScoreRecord) -> Result<(), StoreError>;

    /// Returns at most `limit` records ordered by `score`, highest first.
    /// Order among equal scores is whatever the store yields.
    async fn top_scores(&self, limit: i64) -> Result<Vec<ScoreRecord>, StoreError>;
}
