//! Daemon: Main runtime orchestrator.
//!
//! The Daemon ties together:
//! - Trade store (memory, file or remote sheet)
//! - Journal service (scoring + persistence)
//! - API Server (HTTP endpoints)
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Open the configured store
//! 3. Report the existing journal
//! 4. Start API server
//! 5. Wait for SIGINT
//! 6. Graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use journal_store::{FileStore, MemoryStore, TradeStore};

use crate::api::{create_router, ApiState};
use crate::config::{Config, StoreConfig};
use crate::error::{DaemonError, DaemonResult};
use crate::journal::Journal;

// =============================================================================
// Daemon
// =============================================================================

/// The trade journal daemon.
pub struct Daemon {
    /// Configuration
    config: Config,
    /// Journal service
    journal: Journal<dyn TradeStore>,
}

impl Daemon {
    /// Create a daemon over an already opened store.
    pub fn new(config: Config, store: Arc<dyn TradeStore>) -> Self {
        Self {
            config,
            journal: Journal::new(store),
        }
    }

    /// Create a daemon with the store named in the configuration.
    pub fn from_config(config: Config) -> DaemonResult<Self> {
        let store = build_store(&config.store)?;
        Ok(Self::new(config, store))
    }

    /// Journal service
    pub fn journal(&self) -> &Journal<dyn TradeStore> {
        &self.journal
    }

    /// Run the daemon.
    ///
    /// This method blocks until shutdown is requested (SIGINT).
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            store = self.journal.store().backend(),
            "Starting trade journal daemon"
        );

        // 1. Report existing journal
        self.report_journal().await?;

        // 2. Start API server
        let api_addr = self.start_api_server().await?;
        info!(%api_addr, "API server started");

        // 3. Wait for shutdown
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| DaemonError::Server(format!("Failed to listen for shutdown: {}", e)))?;
        info!("Received shutdown signal");

        // 4. Graceful shutdown
        self.shutdown().await?;

        Ok(())
    }

    /// Log how many trades the store already holds.
    async fn report_journal(&self) -> DaemonResult<usize> {
        let count = self.journal.store().count().await?;

        if count > 0 {
            info!(count, "Loaded existing journal");
        } else {
            info!("Journal is empty");
        }

        Ok(count)
    }

    /// Start the API server.
    async fn start_api_server(&self) -> DaemonResult<SocketAddr> {
        let state = Arc::new(ApiState {
            journal: self.journal.clone(),
        });

        let router = create_router(state).layer(TraceLayer::new_for_http());
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);

        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            DaemonError::Server(format!("Failed to bind to {}: {}", addr, e))
        })?;

        let local_addr = listener.local_addr().map_err(|e| {
            DaemonError::Server(format!("Failed to get local address: {}", e))
        })?;

        // Spawn the server task
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!(error = %e, "API server error");
            }
        });

        Ok(local_addr)
    }

    /// Graceful shutdown.
    async fn shutdown(&self) -> DaemonResult<()> {
        info!("Initiating graceful shutdown");

        let count = self.journal.store().count().await?;
        info!(trades = count, "Shutdown complete");

        Ok(())
    }
}

/// Open the store described by `config`.
pub fn build_store(config: &StoreConfig) -> DaemonResult<Arc<dyn TradeStore>> {
    let store: Arc<dyn TradeStore> = match config {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::File { path } => Arc::new(FileStore::new(path.clone())),
        #[cfg(feature = "sheets")]
        StoreConfig::Sheet {
            url,
            worksheet,
            token,
        } => Arc::new(journal_store::SheetStore::new(url, worksheet, token.clone())?),
        #[cfg(not(feature = "sheets"))]
        StoreConfig::Sheet { .. } => {
            return Err(DaemonError::Config(
                "JOURNAL_STORE=sheet requires the `sheets` feature".to_string(),
            ))
        },
    };

    info!(backend = store.backend(), "Trade store opened");
    Ok(store)
}

// =============================================================================
// Tests
// =============================================================================
