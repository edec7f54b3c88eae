//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/staybook/config.toml`).
//! Every section and field has a default, so a missing file or a partial
//! file both produce a usable configuration.

use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::shared::InfraError;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "STAYBOOK_CONFIG";

/// Root application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub bookings: BookingsConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8000,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    #[default]
    Sqlite,
    Postgres,
}

/// `[database]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub driver: DatabaseDriver,
    pub sqlite: SqliteConfig,
    pub postgres: PostgresConfig,
    pub pool: PoolConfig,
}

impl DatabaseSettings {
    /// Connection URL for the selected driver. Postgres credentials are
    /// percent-encoded.
    pub fn connection_url(&self) -> String {
        match self.driver {
            DatabaseDriver::Sqlite => format!("sqlite://{}?mode=rwc", self.sqlite.path),
            DatabaseDriver::Postgres => format!(
                "postgres://{}:{}@{}:{}/{}",
                utf8_percent_encode(&self.postgres.user, NON_ALPHANUMERIC),
                utf8_percent_encode(&self.postgres.password, NON_ALPHANUMERIC),
                self.postgres.host,
                self.postgres.port,
                self.postgres.database
            ),
        }
    }

    /// Same as [`connection_url`](Self::connection_url) with the password masked.
    pub fn display_url(&self) -> String {
        match self.driver {
            DatabaseDriver::Sqlite => self.connection_url(),
            DatabaseDriver::Postgres => format!(
                "postgres://{}:***@{}:{}/{}",
                self.postgres.user, self.postgres.host, self.postgres.port, self.postgres.database
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    pub path: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "./staybook.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "staybook".to_string(),
            password: String::new(),
            database: "staybook".to_string(),
        }
    }
}

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. `info` or `staybook=debug,tower_http=info`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Accept any origin; `allowed_origins` is ignored when set
    pub allow_all: bool,
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_all: false,
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingsConfig {
    /// Reject bookings whose dates overlap a non-cancelled booking
    pub strict_overlap_check: bool,
}

impl AppConfig {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InfraError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| InfraError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<(), InfraError> {
        if self.server.api_port == 0 {
            return Err(InfraError::Config("server.api_port must not be 0".into()));
        }
        if self.database.pool.max_connections == 0 {
            return Err(InfraError::Config(
                "database.pool.max_connections must be at least 1".into(),
            ));
        }
        if self.database.pool.min_connections > self.database.pool.max_connections {
            return Err(InfraError::Config(
                "database.pool.min_connections exceeds max_connections".into(),
            ));
        }
        if self.database.driver == DatabaseDriver::Sqlite && self.database.sqlite.path.is_empty() {
            return Err(InfraError::Config("database.sqlite.path is empty".into()));
        }
        match self.logging.format.to_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(InfraError::Config(format!(
                "logging.format must be 'text' or 'json', got '{other}'"
            ))),
        }
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

/// Config file location: `$STAYBOOK_CONFIG`, else
/// `~/.config/staybook/config.toml`, else `./config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .map(|dir| dir.join("staybook").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
