//! Configuration module for the PromptOverflow backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite file backing the key-value store
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Populate an empty store with the demo posts and users
    pub seed_demo: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("PROMPTOVERFLOW_DB_PATH")
            .unwrap_or_else(|_| "./data/promptoverflow.sqlite".to_string())
            .into();

        let bind_addr = env::var("PROMPTOVERFLOW_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| {
                AppError::Internal(format!("Invalid PROMPTOVERFLOW_BIND_ADDR format: {}", e))
            })?;

        let log_level = env::var("PROMPTOVERFLOW_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let seed_demo = env::var("PROMPTOVERFLOW_SEED_DEMO")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            seed_demo,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
