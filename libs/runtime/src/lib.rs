//! Application runtime: configuration loading and logging setup.

pub mod config;
pub mod logging;

pub use config::{AppConfig, CliArgs, LoggingConfig};
