//! In-memory store implementation
//!
//! Used for testing and development without a backing file or sheet.
//! Thread-safe using RwLock for concurrent access.

use crate::error::StoreError;
use crate::repository::TradeStore;
use async_trait::async_trait;
use journal_domain::TradeRecord;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// In-memory journal
pub struct MemoryStore {
    trades: RwLock<Vec<TradeRecord>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            trades: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-filled with records (insertion order kept)
    pub fn with_records(records: Vec<TradeRecord>) -> Self {
        Self {
            trades: RwLock::new(records),
        }
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.trades.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when the journal is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all data (useful for test setup)
    pub fn clear(&self) {
        self.trades.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn append(&self, record: &TradeRecord) -> Result<usize, StoreError> {
        let mut trades = self.trades.write().unwrap_or_else(PoisonError::into_inner);
        trades.push(record.clone());
        let position = trades.len() - 1;
        info!(position, trade_id = %record.id, backend = "memory", "Trade appended");
        Ok(position)
    }

    async fn list(&self) -> Result<Vec<TradeRecord>, StoreError> {
        Ok(self.trades.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn delete(&self, position: usize) -> Result<TradeRecord, StoreError> {
        let mut trades = self.trades.write().unwrap_or_else(PoisonError::into_inner);
        if position >= trades.len() {
            return Err(StoreError::not_found(position, trades.len()));
        }
        let removed = trades.remove(position);
        info!(position, trade_id = %removed.id, backend = "memory", "Trade deleted");
        Ok(removed)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.len())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// Tests
// =============================================================================
