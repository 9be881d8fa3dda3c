//! Repository trait definition (Port)
//!
//! The journal is an ordered, append-only list with delete-by-position.
//! Implementations can be in-memory, a local file, or a remote sheet.

use crate::error::StoreError;
use async_trait::async_trait;
use journal_domain::TradeRecord;

/// Persistent, insertion-ordered store of journal entries
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Append a record; returns its 0-based position
    async fn append(&self, record: &TradeRecord) -> Result<usize, StoreError>;

    /// All records in insertion order
    async fn list(&self) -> Result<Vec<TradeRecord>, StoreError>;

    /// Remove the record at `position` and return it
    ///
    /// # Errors
    /// `StoreError::NotFound` if `position` is past the end
    async fn delete(&self, position: usize) -> Result<TradeRecord, StoreError>;

    /// Number of records
    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}
