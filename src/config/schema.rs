//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the exporter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the exporter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ExporterConfig {
    /// HTTP server settings (listen address, telemetry path).
    pub server: ServerConfig,

    /// Upstream API being probed.
    pub upstream: UpstreamConfig,

    /// Refresh scheduling (on-demand vs fixed-rate).
    pub refresh: RefreshConfig,

    /// Exposed metric naming.
    pub metrics: MetricsConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:9133" or ":9133").
    pub listen_address: String,

    /// Path under which metrics are exposed.
    pub telemetry_path: String,

    /// Title shown on the landing page.
    pub landing_title: String,

    /// Upper bound for handling a single HTTP request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:9133".to_string(),
            telemetry_path: "/metrics".to_string(),
            landing_title: "Binance API Weight Exporter".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base endpoint, without trailing path (e.g., "https://api.binance.com").
    pub endpoint: String,

    /// Cheap request path appended to the endpoint for each probe.
    pub probe_path: String,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,

    /// Skip TLS certificate verification. Only for self-signed or test upstreams.
    pub insecure_skip_verify: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.binance.com".to_string(),
            probe_path: "/api/v3/ping".to_string(),
            timeout_secs: 10,
            insecure_skip_verify: false,
        }
    }
}

/// Refresh scheduling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Probe on a fixed schedule instead of on every scrape.
    pub auto_scrape: bool,

    /// Fixed-rate period in seconds.
    pub period_secs: u64,

    /// Second of the minute each fixed-rate probe is aligned to.
    pub align_second: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_scrape: false,
            period_secs: 60,
            align_second: 58,
        }
    }
}

/// Metric naming configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Namespace prefix for every exposed series.
    pub namespace: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: "binance".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
