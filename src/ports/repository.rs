//! Repository Port - Record Collection Persistence Interface
//!
//! The store persists by rewriting the whole collection after every
//! mutation, so the port only needs whole-collection reads and writes.

use async_trait::async_trait;

use crate::domain::{Record, StoreError};

/// Trait for record persistence providers.
///
/// `save` must either replace the persisted collection entirely or
/// leave the previous one intact. Callers rely on this to keep memory
/// and disk consistent when a save fails.
#[async_trait]
pub trait RecordRepository: Send + Sync + 'static {
  /// Read the persisted collection.
  ///
  /// Returns `None` when nothing has been persisted yet (first run).
  async fn load(&self) -> Result<Option<Vec<Record>>, StoreError>;

  /// Replace the persisted collection with `records`.
  async fn save(&self, records: &[Record]) -> Result<(), StoreError>;

  /// Check if the backing storage is reachable and writable.
  async fn is_healthy(&self) -> bool;
}
