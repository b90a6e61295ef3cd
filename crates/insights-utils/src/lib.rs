//! Process setup shared by the insights binaries: tracing and server
//! configuration.

pub mod config;
pub mod logging;

pub use config::{ConfigError, ServerConfig};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
