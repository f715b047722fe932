use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::CoreError;
use crate::models::record::{NewTradeRecord, TradeRecord, TradeRecordPatch};

/// Contract for the external per-user trade record store.
///
/// The production collaborator is a hosted document database; tests and
/// demos use [`crate::store::memory::InMemoryTradeStore`]. Listing is
/// ordered by date descending. Subscriptions push the FULL record
/// snapshot on any change, with last-write-wins semantics: consumers
/// only ever care about the most recent snapshot.
///
/// Write failures surface to the caller as errors and are not retried
/// automatically.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// All records for a user, newest date first.
    async fn list(&self, user_id: &str) -> Result<Vec<TradeRecord>, CoreError>;

    /// Append a record; the store assigns and returns its id.
    /// The record is validated before it is accepted.
    async fn create(&self, user_id: &str, record: NewTradeRecord) -> Result<String, CoreError>;

    /// Apply a partial update to an existing record.
    async fn update(
        &self,
        user_id: &str,
        id: &str,
        patch: TradeRecordPatch,
    ) -> Result<(), CoreError>;

    /// Remove a record.
    async fn delete(&self, user_id: &str, id: &str) -> Result<(), CoreError>;

    /// Subscribe to snapshot pushes for a user. The receiver always
    /// holds the latest full snapshot; intermediate snapshots may be
    /// skipped (most recent supersedes prior).
    async fn subscribe(&self, user_id: &str) -> watch::Receiver<Vec<TradeRecord>>;
}
