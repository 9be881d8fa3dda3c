//! Trade Journal Daemon
//!
//! Serves the confluence scorer and the trade journal over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration (in-memory journal)
//! cargo run -p journald
//!
//! # Keep the journal in a local file
//! JOURNAL_STORE=file JOURNAL_FILE_PATH=trades.json cargo run -p journald
//! ```
//!
//! # Environment Variables
//!
//! - `JOURNAL_ENV`: Environment (test, development, production)
//! - `JOURNAL_API_HOST`: API host (default: 0.0.0.0)
//! - `JOURNAL_API_PORT`: API port (default: 8080)
//! - `JOURNAL_STORE`: memory, file or sheet (default: memory)
//! - `JOURNAL_FILE_PATH`: Journal file (default: trade_journal.json)
//! - `JOURNAL_SHEET_URL`: Sheet endpoint base URL (sheet store only)
//! - `JOURNAL_SHEET_WORKSHEET`: Worksheet name (default: Sheet1)
//! - `JOURNAL_SHEET_TOKEN`: Bearer token for the sheet endpoint

use journald::{Config, Daemon};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("journald=info".parse()?))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        api_host = %config.api.host,
        api_port = config.api.port,
        store = config.store.kind(),
        "Trade Journal Daemon"
    );

    // Create and run daemon
    let daemon = Daemon::from_config(config)?;
    daemon.run().await?;

    Ok(())
}
