//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, alignment second < 60)
//! - Check the upstream endpoint and listen address parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExporterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ExporterConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listen address '{0}'")]
    ListenAddress(String),

    #[error("telemetry path '{0}' must start with '/' and must not be '/'")]
    TelemetryPath(String),

    #[error("invalid upstream endpoint '{endpoint}': {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error("probe path '{0}' must start with '/'")]
    ProbePath(String),

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("align_second must be between 0 and 59, got {0}")]
    AlignSecond(u32),

    #[error("invalid metric namespace '{0}'")]
    Namespace(String),

    #[error("unknown log level '{0}'")]
    LogLevel(String),

    #[error("upstream.timeout_secs ({probe}) must be less than server.request_timeout_secs ({request})")]
    ProbeTimeout { probe: u64, request: u64 },
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Accept Go-style ":port" addresses by binding every interface.
pub fn normalize_listen_address(address: &str) -> String {
    if address.starts_with(':') {
        format!("0.0.0.0{}", address)
    } else {
        address.to_string()
    }
}

/// Parse the configured upstream endpoint into a URL.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(endpoint).map_err(|e| ValidationError::Endpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::Endpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn is_valid_namespace(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &ExporterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listen = normalize_listen_address(&config.server.listen_address);
    if listen.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::ListenAddress(
            config.server.listen_address.clone(),
        ));
    }

    let path = &config.server.telemetry_path;
    if !path.starts_with('/') || path == "/" {
        errors.push(ValidationError::TelemetryPath(path.clone()));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "server.request_timeout_secs",
        });
    }

    if let Err(e) = parse_endpoint(&config.upstream.endpoint) {
        errors.push(e);
    }

    if !config.upstream.probe_path.starts_with('/') {
        errors.push(ValidationError::ProbePath(
            config.upstream.probe_path.clone(),
        ));
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "upstream.timeout_secs",
        });
    }

    // An on-demand scrape waits for the probe; it must finish first so the
    // scrape still answers with up=0 instead of a server timeout.
    if config.upstream.timeout_secs >= config.server.request_timeout_secs {
        errors.push(ValidationError::ProbeTimeout {
            probe: config.upstream.timeout_secs,
            request: config.server.request_timeout_secs,
        });
    }

    if config.refresh.period_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "refresh.period_secs",
        });
    }

    if config.refresh.align_second > 59 {
        errors.push(ValidationError::AlignSecond(config.refresh.align_second));
    }

    if !is_valid_namespace(&config.metrics.namespace) {
        errors.push(ValidationError::Namespace(config.metrics.namespace.clone()));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
