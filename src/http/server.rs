//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the probe, cache, collector and refresh strategy from config
//! - Create Axum Router with the metrics and landing handlers
//! - Wire up middleware (tracing, request timeout)
//! - Start the fixed-rate refresh task when configured
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use prometheus::Registry;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::collector::{FixedRate, ObservationCache, OnDemand, RefreshStrategy, WeightCollector};
use crate::config::validation::validate_config;
use crate::config::{ConfigError, ExporterConfig};
use crate::error::Result;
use crate::http::handlers::{landing_handler, landing_page, metrics_handler};
use crate::upstream::UpstreamProbe;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub strategy: Arc<dyn RefreshStrategy>,
    pub landing: Arc<str>,
}

/// HTTP server exposing upstream weight metrics.
pub struct ExporterServer {
    router: Router,
    config: ExporterConfig,
    strategy: Arc<dyn RefreshStrategy>,
    refresher: Option<FixedRate>,
}

impl ExporterServer {
    /// Create a new exporter server with the given configuration.
    pub fn new(config: ExporterConfig) -> Result<Self> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let cache = ObservationCache::new();
        let probe = UpstreamProbe::new(&config.upstream, cache.clone())?;

        let registry = Registry::new();
        registry.register(Box::new(WeightCollector::new(
            &config.metrics.namespace,
            cache.clone(),
        )?))?;

        let refresher = config
            .refresh
            .auto_scrape
            .then(|| FixedRate::new(probe.clone(), &config.refresh));
        let strategy: Arc<dyn RefreshStrategy> = match &refresher {
            Some(fixed) => Arc::new(fixed.clone()),
            None => Arc::new(OnDemand::new(probe)),
        };

        let state = AppState {
            registry,
            strategy: strategy.clone(),
            landing: landing_page(&config.server.landing_title, &config.server.telemetry_path)
                .into(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            strategy,
            refresher,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ExporterConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.server.telemetry_path, get(metrics_handler))
            .route("/", get(landing_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Fixed-rate refresher, present only in fixed-rate mode.
    pub fn refresher(&self) -> Option<&FixedRate> {
        self.refresher.as_ref()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            telemetry_path = %self.config.server.telemetry_path,
            mode = %self.strategy.mode(),
            "HTTP server starting"
        );

        if let Some(refresher) = &self.refresher {
            refresher.spawn(shutdown.resubscribe());
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
