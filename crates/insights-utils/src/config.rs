//! Server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {name}: {detail}")]
    InvalidValue { name: String, detail: String },
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Application name, shown in the page title
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Address the server listens on
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: "Financial Insights Agent".to_string(),
            environment: "development".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `INSIGHTS_BIND_ADDR` (default `127.0.0.1:8501`) and
    /// `INSIGHTS_ENV` (default `development`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_addr =
            std::env::var("INSIGHTS_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                name: "INSIGHTS_BIND_ADDR".to_string(),
                detail: format!("{raw_addr}: {e}"),
            })?;

        let environment =
            std::env::var("INSIGHTS_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            bind_addr,
            environment,
            ..Self::default()
        })
    }

    /// Override the bind address
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }
}
