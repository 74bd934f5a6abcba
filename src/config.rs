//! Server Configuration
//!
//! Configuration for the HTTP server and the database pool: bind address,
//! database URL, pool sizing, timeouts, upload directory and CORS origins.
//!
//! Everything can be overridden from the environment; `PORT` is honoured
//! for parity with common hosting platforms.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3001)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database URL (default: "sqlite://campusd.sqlite3")
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum number of pooled connections (default: 5)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection before failing (default: 5)
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Seconds a single statement or batch transaction may run (default: 30)
    #[serde(default = "default_statement_timeout_secs")]
    pub statement_timeout_secs: u64,

    /// Directory uploaded files are stored under (default: "uploads")
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// CORS allowed origins (empty = permissive, for development)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_database_url() -> String {
    "sqlite://campusd.sqlite3".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_statement_timeout_secs() -> u64 {
    30
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            statement_timeout_secs: default_statement_timeout_secs(),
            upload_dir: default_upload_dir(),
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Build a config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("CAMPUSD_HOST") {
            config.host = host;
        }
        if let Some(port) = env_parse("PORT") {
            config.port = port;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(n) = env_parse("CAMPUSD_MAX_CONNECTIONS") {
            config.max_connections = n;
        }
        if let Some(n) = env_parse("CAMPUSD_ACQUIRE_TIMEOUT_SECS") {
            config.acquire_timeout_secs = n;
        }
        if let Some(n) = env_parse("CAMPUSD_STATEMENT_TIMEOUT_SECS") {
            config.statement_timeout_secs = n;
        }
        if let Ok(dir) = std::env::var("CAMPUSD_UPLOAD_DIR") {
            config.upload_dir = dir;
        }
        if let Ok(origins) = std::env::var("CAMPUSD_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool acquisition timeout
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Statement / batch-transaction timeout
    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.statement_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
