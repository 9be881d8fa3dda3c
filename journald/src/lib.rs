//! Trade Journal Daemon Library
//!
//! Runtime host for the confluence scorer and the trade journal.
//!
//! # Architecture
//!
//! ```text
//! HTTP client → API Server → Journal → Scorer (journal-engine)
//!                               ↓
//!                          TradeStore (memory | file | sheet)
//! ```
//!
//! # Components
//!
//! - **Daemon**: Main runtime orchestrator
//! - **Journal**: Scores submissions and keeps the trade log
//! - **API**: HTTP endpoints for the journal UI
//! - **Config**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use journald::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let daemon = Daemon::from_config(config)?;
//!     daemon.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod daemon;
pub mod error;
pub mod journal;

// Re-exports for convenience
pub use config::{ApiConfig, Config, Environment, StoreConfig};
pub use daemon::{build_store, Daemon};
pub use error::{DaemonError, DaemonResult};
pub use journal::{Journal, Submitted};
