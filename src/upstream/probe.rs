//! Upstream rate-limit probe.
//!
//! # Responsibilities
//! - Issue one cheap GET against the upstream
//! - Extract used-weight headers from the response
//! - Record the outcome in the observation cache
//!
//! # Design Decisions
//! - Only transport errors (connect, DNS, TLS, timeout) mark the upstream down
//! - Non-2xx responses still count as reachable
//! - No retries; the next probe is the retry

use std::time::{Duration, Instant};

use reqwest::Client;
use url::Url;

use crate::collector::observation::{ObservationCache, ProbeState};
use crate::config::UpstreamConfig;
use crate::config::validation::parse_endpoint;
use crate::error::ExporterError;
use crate::upstream::headers::{weight_or_zero, USED_WEIGHT, USED_WEIGHT_1M};

const USER_AGENT: &str = concat!("weight-exporter/", env!("CARGO_PKG_VERSION"));

/// Probes the upstream and writes results into the shared cache.
#[derive(Clone)]
pub struct UpstreamProbe {
    client: Client,
    url: Url,
    cache: ObservationCache,
}

impl UpstreamProbe {
    /// Build the probe and its HTTP client from configuration.
    pub fn new(config: &UpstreamConfig, cache: ObservationCache) -> Result<Self, ExporterError> {
        let url = probe_url(&config.endpoint, &config.probe_path)?;

        if config.insecure_skip_verify {
            tracing::warn!(
                endpoint = %config.endpoint,
                "TLS certificate verification disabled for upstream probes"
            );
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()
            .map_err(ExporterError::Client)?;

        Ok(Self { client, url, cache })
    }

    /// Run one probe and record the result. Never fails: transport errors
    /// are logged and stored as an unreachable observation.
    pub async fn probe(&self) -> ProbeState {
        let start = Instant::now();
        tracing::debug!(url = %self.url, "Weight requested");

        let (previous, current) = match self.client.get(self.url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    tracing::debug!(url = %self.url, status = %status, "Upstream returned non-success status");
                }

                let headers = response.headers();
                let weight_used = weight_or_zero(headers, USED_WEIGHT);
                let weight_used_1m = weight_or_zero(headers, USED_WEIGHT_1M);

                tracing::debug!(
                    weight_used,
                    weight_used_1m,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Probe succeeded"
                );
                let previous = self.cache.record_success(weight_used, weight_used_1m);
                (previous, ProbeState::Up)
            }
            Err(e) => {
                tracing::warn!(
                    url = %self.url,
                    error = %e,
                    timeout = e.is_timeout(),
                    "Probe failed: upstream unreachable"
                );
                (self.cache.record_failure(), ProbeState::Down)
            }
        };

        log_transition(previous, current);
        current
    }
}

fn log_transition(previous: ProbeState, current: ProbeState) {
    if previous == current {
        return;
    }
    match current {
        ProbeState::Up => tracing::info!(from = ?previous, "Upstream reachable"),
        ProbeState::Down => tracing::warn!(from = ?previous, "Upstream unreachable"),
        ProbeState::Init => {}
    }
}

/// Join the base endpoint and the cheap probe path.
pub fn probe_url(endpoint: &str, probe_path: &str) -> Result<Url, ExporterError> {
    let base = parse_endpoint(endpoint).map_err(|e| ExporterError::InvalidEndpoint(e.to_string()))?;
    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), probe_path);
    Url::parse(&joined).map_err(|e| ExporterError::InvalidEndpoint(e.to_string()))
}
