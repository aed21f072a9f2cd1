use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::OnceCell;

use super::{SharedStore, StoreError};

/// Opens the connection behind a [`ConnectionManager`].
#[rocket::async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self) -> Result<SharedStore, StoreError>;
}

/// Lazily connects to the store on first use and hands out the same handle afterwards.
///
/// The first attempt is memoized whatever its outcome. Concurrent first callers wait
/// on that one attempt. If it failed, the failure is kept for the lifetime of the
/// process: every later call reports it again and nothing reconnects.
pub struct ConnectionManager {
    connector: Box<dyn Connector>,
    attempt: OnceCell<Result<SharedStore, StoreError>>,
    attempts: AtomicUsize,
}

impl ConnectionManager {
    pub fn new<C: Connector>(connector: C) -> Self {
        Self {
            connector: Box::new(connector),
            attempt: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Returns the collection handle, or `None` if connecting failed.
    pub async fn get_scores_collection(&self) -> Option<SharedStore> {
        let attempt = self
            .attempt
            .get_or_init(|| async {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                self.connector.connect().await
            })
            .await;

        match attempt {
            Ok(store) => Some(store.clone()),
            Err(error) => {
                tracing::error!(%error, "failed to connect to the database");
                None
            }
        }
    }

    /// Number of times the connector has been run.
    pub fn connect_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}
