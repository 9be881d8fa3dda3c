//! Trading Journal Storage Layer
//!
//! Provides persistence for scored journal entries.
//!
//! # Architecture
//!
//! - **TradeStore trait**: Defines the storage interface (port)
//! - **In-memory store**: Fast implementation for testing
//! - **File store**: JSON file on local disk
//! - **Sheet store**: Shared remote worksheet (feature `sheets`)
//!
//! # Usage
//!
//! ```rust
//! use journal_store::{MemoryStore, TradeStore};
//! use journal_domain::{TradeRecord, TradeSubmission};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new();
//!
//!     let record = TradeRecord::new(TradeSubmission::default(), Decimal::ZERO);
//!     let position = store.append(&record).await.unwrap();
//!
//!     let trades = store.list().await.unwrap();
//!     println!("Trade {} of {}", position + 1, trades.len());
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod error;
mod file;
mod memory;
mod repository;
mod row;
#[cfg(feature = "sheets")]
mod sheet;

// Re-exports
pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::TradeStore;
pub use row::{export_csv, TradeRow, COLUMNS, DATE_TIME_FORMAT};
#[cfg(feature = "sheets")]
pub use sheet::SheetStore;
