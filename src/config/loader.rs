//! Configuration loading from disk and command-line overrides.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ExporterConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values supplied on the command line or through the environment.
///
/// Each `Some` replaces whatever the defaults or the config file provided.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen_address: Option<String>,
    pub telemetry_path: Option<String>,
    pub endpoint: Option<String>,
    pub auto_scrape: Option<bool>,
    pub insecure_skip_verify: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl ConfigOverrides {
    /// Apply the overrides on top of `config`.
    pub fn apply(self, config: &mut ExporterConfig) {
        if let Some(address) = self.listen_address {
            config.server.listen_address = address;
        }
        if let Some(path) = self.telemetry_path {
            config.server.telemetry_path = path;
        }
        if let Some(endpoint) = self.endpoint {
            config.upstream.endpoint = endpoint;
        }
        if let Some(auto_scrape) = self.auto_scrape {
            config.refresh.auto_scrape = auto_scrape;
        }
        if let Some(insecure) = self.insecure_skip_verify {
            config.upstream.insecure_skip_verify = insecure;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}

/// Parse a TOML document into a configuration without validating it.
pub fn parse_config(content: &str) -> Result<ExporterConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ExporterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve the effective configuration: defaults, then the optional file,
/// then overrides. Validation runs once on the merged result.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<ExporterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => ExporterConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
