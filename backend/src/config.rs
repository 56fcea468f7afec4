//! Configuration management for the Supply Chain Management API
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides: `SCM_` prefix, `__` between nested keys
//!    (e.g. `SCM_DATABASE__URL`, `SCM_LEDGER__DEFAULT_RECEIVING_WAREHOUSE_ID`)

use std::time::Duration;

use config::{ConfigError, Environment, File, Map};
use serde::Deserialize;

use shared::WarehouseId;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Stock ledger configuration
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Upper bound on the lifetime of a single request
    pub request_timeout_secs: u64,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// How long a caller waits for a free connection
    pub acquire_timeout_secs: u64,

    /// Idle connections are closed after this long
    pub idle_timeout_secs: u64,

    /// Every connection is retired after this long
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Warehouse credited when a purchase order is received
    pub default_receiving_warehouse_id: WarehouseId,

    /// Deadline for every multi-statement ledger transaction
    pub transaction_timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading overrides from `vars` instead of the
    /// process environment when given.
    pub fn load_from(vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let environment = match &vars {
            Some(vars) => vars.get("SCM_ENVIRONMENT").cloned(),
            None => std::env::var("SCM_ENVIRONMENT").ok(),
        }
        .unwrap_or_else(|| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8080)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 60)?
            .set_default("database.max_lifetime_secs", 180)?
            .set_default("ledger.default_receiving_warehouse_id", 1)?
            .set_default("ledger.transaction_timeout_secs", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SCM_ prefix)
            .add_source(
                Environment::with_prefix("SCM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .source(vars),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl LedgerConfig {
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_secs(self.transaction_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            request_timeout_secs: 30,
            cors_origins: Vec::new(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_receiving_warehouse_id: 1,
            transaction_timeout_secs: 10,
        }
    }
}
