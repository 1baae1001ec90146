//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

/// Ledger configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Row-lock acquisition deadline inside a unit of work
    pub lock_timeout: Duration,

    /// Whole-call deadline for a single transfer
    pub transfer_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let lock_timeout_ms: u64 = env::var("LOCK_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("LOCK_TIMEOUT_MS"))?;

        let transfer_timeout_ms: u64 = env::var("TRANSFER_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TRANSFER_TIMEOUT_MS"))?;

        Ok(Self {
            database_url,
            database_max_connections,
            lock_timeout: Duration::from_millis(lock_timeout_ms),
            transfer_timeout: Duration::from_millis(transfer_timeout_ms),
        })
    }

    /// Configuration with defaults for everything except the connection URL.
    /// Used by callers that already hold a DSN (tests, scripts).
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            database_max_connections: 10,
            lock_timeout: Duration::from_millis(5000),
            transfer_timeout: Duration::from_millis(10000),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
