//! Runtime server configuration
//!
//! `ServerConfig` is built once at startup from environment variables and is
//! immutable afterwards.
//!
//! | Variable            | Default            | Meaning                                |
//! |---------------------|--------------------|----------------------------------------|
//! | `ATLAS_HOST`        | `127.0.0.1`        | Bind address                           |
//! | `ATLAS_PORT`        | `3001`             | Bind port                              |
//! | `ATLAS_STORE`       | `memory`           | `memory` or `surreal`                  |
//! | `ATLAS_DB_PATH`     | `./data/atlas.db`  | Database directory for `surreal`       |
//! | `CORS_ALLOW_ORIGIN` | unset (any origin) | Comma-separated list of allowed origins |

use axum::http::HeaderValue;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DB_PATH: &str = "./data/atlas.db";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid ATLAS_PORT '{0}': expected a number between 0 and 65535")]
    InvalidPort(String),

    #[error("Invalid ATLAS_HOST '{0}': expected an IP address")]
    InvalidHost(String),

    #[error("Unknown ATLAS_STORE '{0}': expected 'memory' or 'surreal'")]
    UnknownStore(String),

    #[error("ATLAS_STORE=surreal requires building with the `surrealdb` feature")]
    SurrealDisabled,

    #[error("Invalid CORS origin '{0}'")]
    InvalidOrigin(String),
}

/// Which record store backend to open at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Surreal { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub store: StoreBackend,
    /// Empty means any origin is allowed
    pub cors_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            store: StoreBackend::Memory,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of an
    /// environment variable or `None` when unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("ATLAS_HOST") {
            config.host = host
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidHost(host.clone()))?;
        }

        if let Some(port) = lookup("ATLAS_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        config.store = match lookup("ATLAS_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StoreBackend::Memory,
            Some("surreal") => {
                if cfg!(not(feature = "surrealdb")) {
                    return Err(ConfigError::SurrealDisabled);
                }
                let path = lookup("ATLAS_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
                StoreBackend::Surreal {
                    path: PathBuf::from(path),
                }
            }
            Some(other) => return Err(ConfigError::UnknownStore(other.to_string())),
        };

        if let Some(origins) = lookup("CORS_ALLOW_ORIGIN") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(|o| {
                    o.parse::<HeaderValue>()
                        .map_err(|_| ConfigError::InvalidOrigin(o.to_string()))
                })
                .collect::<Result<_, _>>()?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.store, StoreBackend::Memory);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ATLAS_HOST", "0.0.0.0"),
            ("ATLAS_PORT", "8080"),
            ("CORS_ALLOW_ORIGIN", "http://localhost:5173, http://localhost:1420"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            load(&[("ATLAS_PORT", "http")]).unwrap_err(),
            ConfigError::InvalidPort("http".to_string())
        );
        assert_eq!(
            load(&[("ATLAS_HOST", "localhost")]).unwrap_err(),
            ConfigError::InvalidHost("localhost".to_string())
        );
        assert_eq!(
            load(&[("ATLAS_STORE", "dynamo")]).unwrap_err(),
            ConfigError::UnknownStore("dynamo".to_string())
        );
    }

    #[cfg(feature = "surrealdb")]
    #[test]
    fn test_surreal_backend_path() {
        let config = load(&[("ATLAS_STORE", "surreal"), ("ATLAS_DB_PATH", "/tmp/atlas")]).unwrap();
        assert_eq!(
            config.store,
            StoreBackend::Surreal {
                path: PathBuf::from("/tmp/atlas")
            }
        );
    }

    #[cfg(not(feature = "surrealdb"))]
    #[test]
    fn test_surreal_backend_requires_feature() {
        assert_eq!(
            load(&[("ATLAS_STORE", "surreal")]).unwrap_err(),
            ConfigError::SurrealDisabled
        );
    }
}
