use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/postlab.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Root configuration. Every section and field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostlabConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: DEFAULT_ADDR.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: DEFAULT_DATABASE_URL.to_string(), max_connections: DEFAULT_MAX_CONNECTIONS }
    }
}

/// Outbound call settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: concat!("postlab/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl PostlabConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.addr.trim().is_empty() {
            return Err(ConfigError::Validation("server.addr must not be empty".to_string()));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation("database.url must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        if self.dispatch.connect_timeout_ms == 0 || self.dispatch.request_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "dispatch timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
