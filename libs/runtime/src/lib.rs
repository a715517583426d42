//! Process-level runtime concerns: layered configuration and logging setup.

pub mod config;
pub mod logging;

pub use config::{AppConfig, CliArgs, HttpConfig, LoggingConfig, Section, ServerConfig};
