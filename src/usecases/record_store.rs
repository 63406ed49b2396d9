//! Record Store - Ordered Record Collection with Write-Through Persistence
//!
//! Owns the in-memory collection. Every mutation is applied in memory,
//! saved through the repository port while the write lock is held, and
//! undone if the save fails. Memory and disk therefore only differ
//! while a save is in flight, and no reader can observe that window.
//!
//! The store never logs; failures are returned to the caller.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::record::{self, NewRecord, Record, RecordId};
use crate::domain::StoreError;
use crate::ports::repository::RecordRepository;

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<Record>,
    closed: bool,
}

impl StoreState {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

/// Expense record store.
///
/// Reads share a read lock; mutations hold the write lock across the
/// save, so at most one mutation and its file write run at a time.
pub struct RecordStore {
    /// Persistence backend.
    repository: Arc<dyn RecordRepository>,
    /// Collection plus lifecycle flag.
    state: RwLock<StoreState>,
}

impl RecordStore {
    /// Create an empty, open store. Call [`RecordStore::load`] before
    /// serving requests.
    pub fn new(repository: Arc<dyn RecordRepository>) -> Self {
        Self {
            repository,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Replace the collection with the repository's contents.
    ///
    /// Nothing persisted yet means an empty collection. On failure the
    /// current collection is left as it was.
    pub async fn load(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.ensure_open()?;
        let records = self.repository.load().await?.unwrap_or_default();
        state.records = records;
        Ok(())
    }

    /// All records in insertion order.
    pub async fn list(&self) -> Vec<Record> {
        self.state.read().await.records.clone()
    }

    /// Record with the given id.
    pub async fn get(&self, id: RecordId) -> Result<Record, StoreError> {
        let state = self.state.read().await;
        state
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Append a record with the next free id and persist.
    pub async fn insert(&self, candidate: NewRecord) -> Result<Record, StoreError> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        let id = record::next_id(&state.records).ok_or(StoreError::IdSpaceExhausted)?;
        let created = candidate.into_record(id);
        state.records.push(created.clone());

        if let Err(e) = self.repository.save(&state.records).await {
            state.records.pop();
            return Err(e);
        }
        Ok(created)
    }

    /// Remove the record with the given id and persist.
    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        let index = state.position(id).ok_or(StoreError::NotFound(id))?;
        let removed = state.records.remove(index);

        if let Err(e) = self.repository.save(&state.records).await {
            state.records.insert(index, removed);
            return Err(e);
        }
        Ok(())
    }

    /// Sum of all amounts; 0 for an empty store.
    pub async fn total_amount(&self) -> i64 {
        record::total_amount(&self.state.read().await.records)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }

    /// Whether the backing repository is usable.
    pub async fn is_healthy(&self) -> bool {
        self.repository.is_healthy().await
    }

    /// Save once more and reject further mutations. Reads keep working.
    /// Closing twice is a no-op.
    pub async fn close(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.closed {
            return Ok(());
        }
        self.repository.save(&state.records).await?;
        state.closed = true;
        Ok(())
    }
}
