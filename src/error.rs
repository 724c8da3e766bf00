//! Startup error types.
//!
//! Probe failures never show up here: they are recorded as an unreachable
//! observation and surface only through the `up` gauge.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid upstream endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
