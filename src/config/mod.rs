//! Configuration module for the taskroster backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Upper bound for a single request, server side and in the task manager
    pub request_timeout: Duration,
}

/// A configuration value that could not be parsed.
#[derive(Debug)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.key, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("TASKROSTER_DB_PATH")
            .unwrap_or_else(|_| "./data/taskroster.sqlite".to_string())
            .into();

        let bind_raw =
            env::var("TASKROSTER_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5001".to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError {
            key: "TASKROSTER_BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let log_level = env::var("TASKROSTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = env::var("TASKROSTER_LOG_FORMAT")
            .map(|s| LogFormat::parse(&s))
            .unwrap_or(LogFormat::Pretty);

        let timeout_raw =
            env::var("TASKROSTER_REQUEST_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string());
        let timeout_secs: u64 = timeout_raw.parse().map_err(|_| ConfigError {
            key: "TASKROSTER_REQUEST_TIMEOUT_SECS",
            value: timeout_raw.clone(),
        })?;

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_format,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
