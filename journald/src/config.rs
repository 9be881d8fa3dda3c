//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{DaemonError, DaemonResult};
use std::env;
use std::path::PathBuf;

/// Default journal file for the file-backed store
pub const DEFAULT_JOURNAL_FILE: &str = "trade_journal.json";

/// Default worksheet name for the sheet store
pub const DEFAULT_WORKSHEET: &str = "Sheet1";

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Trade store backend
    pub store: StoreConfig,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// Which trade store backs the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Process-local, lost on restart
    Memory,
    /// JSON file on local disk
    File {
        /// Path of the journal file
        path: PathBuf,
    },
    /// Shared remote worksheet
    Sheet {
        /// Base URL of the sheet endpoint
        url: String,
        /// Worksheet (tab) name
        worksheet: String,
        /// Optional bearer token
        token: Option<String>,
    },
}

impl StoreConfig {
    /// Backend name as used in `JOURNAL_STORE`
    pub fn kind(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::File { .. } => "file",
            StoreConfig::Sheet { .. } => "sheet",
        }
    }
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment (logged only; the store comes from `JOURNAL_STORE`)
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_environment()?;
        let api = Self::load_api_config()?;
        let store = Self::load_store_config()?;

        Ok(Self {
            api,
            store,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            store: StoreConfig::Memory,
            environment: Environment::Test,
        }
    }

    fn load_environment() -> DaemonResult<Environment> {
        let env_str = env::var("JOURNAL_ENV").unwrap_or_else(|_| "development".to_string());
        Self::environment_for(&env_str)
    }

    fn environment_for(env_str: &str) -> DaemonResult<Environment> {
        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid JOURNAL_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_api_config() -> DaemonResult<ApiConfig> {
        let host = env::var("JOURNAL_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_str = env::var("JOURNAL_API_PORT").unwrap_or_else(|_| "8080".to_string());

        let port = port_str
            .parse::<u16>()
            .map_err(|_| DaemonError::Config(format!("Invalid JOURNAL_API_PORT: {}", port_str)))?;

        Ok(ApiConfig { host, port })
    }

    fn load_store_config() -> DaemonResult<StoreConfig> {
        let kind = env::var("JOURNAL_STORE").unwrap_or_else(|_| "memory".to_string());
        Self::store_config_for(
            &kind,
            env::var("JOURNAL_FILE_PATH").ok(),
            env::var("JOURNAL_SHEET_URL").ok(),
            env::var("JOURNAL_SHEET_WORKSHEET").ok(),
            env::var("JOURNAL_SHEET_TOKEN").ok(),
        )
    }

    fn store_config_for(
        kind: &str,
        file_path: Option<String>,
        sheet_url: Option<String>,
        worksheet: Option<String>,
        token: Option<String>,
    ) -> DaemonResult<StoreConfig> {
        match kind.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreConfig::Memory),
            "file" => Ok(StoreConfig::File {
                path: PathBuf::from(file_path.unwrap_or_else(|| DEFAULT_JOURNAL_FILE.to_string())),
            }),
            "sheet" | "sheets" => {
                let url = sheet_url.filter(|u| !u.trim().is_empty()).ok_or_else(|| {
                    DaemonError::Config("JOURNAL_SHEET_URL is required for the sheet store".into())
                })?;
                Ok(StoreConfig::Sheet {
                    url,
                    worksheet: worksheet.unwrap_or_else(|| DEFAULT_WORKSHEET.to_string()),
                    token: token.filter(|t| !t.is_empty()),
                })
            },
            other => Err(DaemonError::Config(format!(
                "Invalid JOURNAL_STORE: {}. Expected: memory, file, sheet",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            store: StoreConfig::Memory,
            environment: Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
