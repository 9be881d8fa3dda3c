//! Storage layer errors

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record at the requested position
    #[error("Trade not found at position {position} (journal has {len} entries)")]
    NotFound {
        /// Requested 0-based position
        position: usize,
        /// Number of records in the journal
        len: usize,
    },

    /// Local file I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error (reading a file or a sheet row)
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(String),

    /// Remote sheet answered with an error status
    #[error("Remote sheet error: {0}")]
    Remote(String),

    /// Remote sheet could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// Domain error passthrough
    #[error("Domain error: {0}")]
    Domain(#[from] journal_domain::DomainError),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(position: usize, len: usize) -> Self {
        Self::NotFound { position, len }
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Csv(err.to_string())
    }
}

#[cfg(feature = "sheets")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_status() {
            StoreError::Remote(err.to_string())
        } else if err.is_decode() {
            StoreError::Deserialization(err.to_string())
        } else {
            StoreError::Connection(err.to_string())
        }
    }
}
