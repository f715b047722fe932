use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::record::{NewTradeRecord, TradeRecord, TradeRecordPatch};
use super::traits::TradeStore;

/// In-memory trade record store for tests and demos.
///
/// Mirrors the external store's observable behavior: per-user record
/// collections, opaque assigned ids, date-descending listing, and a
/// full-snapshot push on every mutation.
pub struct InMemoryTradeStore {
    users: Mutex<HashMap<String, UserBucket>>,
}

struct UserBucket {
    records: Vec<TradeRecord>,
    tx: watch::Sender<Vec<TradeRecord>>,
}

impl UserBucket {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            records: Vec::new(),
            tx,
        }
    }

    /// Records newest-date-first; same-day records keep insertion order.
    fn snapshot(&self) -> Vec<TradeRecord> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    fn push_snapshot(&self) {
        // Receivers may all be gone; that's fine, send_replace never fails
        self.tx.send_replace(self.snapshot());
    }
}

impl InMemoryTradeStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, UserBucket>>, CoreError> {
        self.users
            .lock()
            .map_err(|_| CoreError::Store("store lock poisoned".into()))
    }
}

impl Default for InMemoryTradeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeStore for InMemoryTradeStore {
    async fn list(&self, user_id: &str) -> Result<Vec<TradeRecord>, CoreError> {
        let users = self.lock()?;
        Ok(users
            .get(user_id)
            .map(|bucket| bucket.snapshot())
            .unwrap_or_default())
    }

    async fn create(&self, user_id: &str, record: NewTradeRecord) -> Result<String, CoreError> {
        let id = Uuid::new_v4().to_string();
        let record = record.into_record(id.clone());
        record.validate()?;

        let mut users = self.lock()?;
        let bucket = users
            .entry(user_id.to_string())
            .or_insert_with(UserBucket::new);
        bucket.records.push(record);
        bucket.push_snapshot();
        Ok(id)
    }

    async fn update(
        &self,
        user_id: &str,
        id: &str,
        patch: TradeRecordPatch,
    ) -> Result<(), CoreError> {
        let mut users = self.lock()?;
        let bucket = users
            .get_mut(user_id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;

        let record = bucket
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;

        let mut updated = record.clone();
        patch.apply(&mut updated);
        updated.validate()?;
        *record = updated;

        bucket.push_snapshot();
        Ok(())
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), CoreError> {
        let mut users = self.lock()?;
        let bucket = users
            .get_mut(user_id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;

        let before = bucket.records.len();
        bucket.records.retain(|r| r.id != id);
        if bucket.records.len() == before {
            return Err(CoreError::RecordNotFound(id.to_string()));
        }

        bucket.push_snapshot();
        Ok(())
    }

    async fn subscribe(&self, user_id: &str) -> watch::Receiver<Vec<TradeRecord>> {
        // Subscribing is infallible; recover the data from a poisoned lock
        let mut users = match self.users.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let bucket = users
            .entry(user_id.to_string())
            .or_insert_with(UserBucket::new);
        // Seed the channel so new subscribers see the current state
        bucket.push_snapshot();
        bucket.tx.subscribe()
    }
}
