//! Environment-driven server configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `BEERSTOCK_BIND_ADDR` | `127.0.0.1:8080` |
//! | `BEERSTOCK_DB_PATH` | `beerstock.sqlite3` (`:memory:` for a throwaway store) |
//! | `BEERSTOCK_LOG_LEVEL` | `debug` in debug builds, `info` otherwise |
//! | `BEERSTOCK_LOG_DIR` | unset: file logging disabled |

use beerstock_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_BIND_ADDR: &str = "BEERSTOCK_BIND_ADDR";
pub const ENV_DB_PATH: &str = "BEERSTOCK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "BEERSTOCK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BEERSTOCK_LOG_DIR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DB_PATH: &str = "beerstock.sqlite3";
const IN_MEMORY_DB: &str = ":memory:";

/// Where the stock database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseLocation,
    pub log_level: String,
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBindAddr(String),
    EmptyValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddr(value) => {
                write!(f, "{ENV_BIND_ADDR} must be a socket address, got `{value}`")
            }
            Self::EmptyValue(key) => write!(f, "{key} is set but empty"),
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(key) {
                Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(key)),
                Some(value) => Ok(Some(value.trim().to_string())),
                None => Ok(None),
            }
        };

        let bind_text = read(ENV_BIND_ADDR)?.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_text
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_text.clone()))?;

        let database = match read(ENV_DB_PATH)? {
            Some(path) if path == IN_MEMORY_DB => DatabaseLocation::InMemory,
            Some(path) => DatabaseLocation::File(PathBuf::from(path)),
            None => DatabaseLocation::File(PathBuf::from(DEFAULT_DB_PATH)),
        };

        Ok(Self {
            bind_addr,
            database,
            log_level: read(ENV_LOG_LEVEL)?.unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DatabaseLocation, ServerConfig};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("beerstock.sqlite3"))
        );
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn memory_marker_selects_in_memory_database() {
        let config = config_from(&[("BEERSTOCK_DB_PATH", ":memory:")]).unwrap();
        assert_eq!(config.database, DatabaseLocation::InMemory);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            config_from(&[("BEERSTOCK_BIND_ADDR", "localhost")]).unwrap_err(),
            ConfigError::InvalidBindAddr("localhost".to_string())
        );
        assert_eq!(
            config_from(&[("BEERSTOCK_LOG_DIR", " ")]).unwrap_err(),
            ConfigError::EmptyValue("BEERSTOCK_LOG_DIR")
        );
    }
}
