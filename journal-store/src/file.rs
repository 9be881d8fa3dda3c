//! File-backed store implementation
//!
//! Keeps the whole journal as a JSON array in one file. Every mutation is a
//! read-modify-write of the full file; a process-local mutex serializes them
//! and the new contents land via a temp file + rename.

use crate::error::StoreError;
use crate::repository::TradeStore;
use async_trait::async_trait;
use journal_domain::TradeRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Journal persisted to a local JSON file
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path` (the file is created on first write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<TradeRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Journal file missing, starting empty");
                return Ok(Vec::new());
            },
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Deserialization(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, records: &[TradeRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TradeStore for FileStore {
    async fn append(&self, record: &TradeRecord) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        records.push(record.clone());
        self.save(&records).await?;

        let position = records.len() - 1;
        info!(
            position,
            trade_id = %record.id,
            path = %self.path.display(),
            "Trade appended"
        );
        Ok(position)
    }

    async fn list(&self) -> Result<Vec<TradeRecord>, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.load().await
    }

    async fn delete(&self, position: usize) -> Result<TradeRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        if position >= records.len() {
            return Err(StoreError::not_found(position, records.len()));
        }
        let removed = records.remove(position);
        self.save(&records).await?;

        info!(
            position,
            trade_id = %removed.id,
            path = %self.path.display(),
            "Trade deleted"
        );
        Ok(removed)
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}
