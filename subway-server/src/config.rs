//! Server configuration.

use std::net::SocketAddr;

/// Environment variable holding the listen address.
pub const BIND_ADDR_VAR: &str = "SUBWAY_BIND_ADDR";

/// Error returned when configuration values cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}: {value:?} is not a socket address")]
pub struct ConfigError {
    var: &'static str,
    value: String,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(BIND_ADDR_VAR) {
            config.bind_addr = value.parse().map_err(|_| ConfigError {
                var: BIND_ADDR_VAR,
                value,
            })?;
        }
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}
