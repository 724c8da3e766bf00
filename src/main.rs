//! Upstream API Weight Exporter
//!
//! Exposes an upstream API's used request weight as Prometheus gauges.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                 WEIGHT EXPORTER                  │
//!                     │                                                  │
//!   Prometheus scrape │  ┌─────────┐   ┌────────────┐   ┌────────────┐   │
//!  ───────────────────┼─▶│  http   │──▶│  refresh   │──▶│  upstream  │───┼──▶ Upstream API
//!                     │  │ server  │   │  strategy  │   │   probe    │   │    (cheap GET)
//!                     │  └────┬────┘   └────────────┘   └─────┬──────┘   │
//!                     │       │                               │          │
//!                     │       ▼                               ▼          │
//!   text exposition   │  ┌─────────┐                   ┌────────────┐    │
//!  ◀──────────────────┼──│ weight  │◀──────────────────│observation │    │
//!                     │  │collector│                   │   cache    │    │
//!                     │  └─────────┘                   └────────────┘    │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use weight_exporter::config::loader::resolve_config;
use weight_exporter::config::validation::normalize_listen_address;
use weight_exporter::config::{ConfigOverrides, LogFormat};
use weight_exporter::lifecycle::signals::wait_for_signal;
use weight_exporter::observability::init_logging;
use weight_exporter::{ExporterServer, Shutdown};

#[derive(Parser)]
#[command(name = "weight-exporter")]
#[command(about = "Prometheus exporter for upstream API request weight", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(long, env = "WEIGHT_EXPORTER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on for telemetry.
    #[arg(long = "web.listen-address")]
    listen_address: Option<String>,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path")]
    telemetry_path: Option<String>,

    /// Upstream API base endpoint.
    #[arg(long = "upstream.endpoint", env = "UPSTREAM_ENDPOINT")]
    endpoint: Option<String>,

    /// Probe on a fixed schedule (second 58 of each minute) instead of on every scrape.
    #[arg(long = "auto-scrape")]
    auto_scrape: bool,

    /// Skip TLS certificate verification for the upstream.
    #[arg(long = "upstream.insecure-skip-verify")]
    insecure_skip_verify: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long = "log.level", env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format.
    #[arg(long = "log.format", value_parser = ["pretty", "json"])]
    log_format: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen_address: self.listen_address.clone(),
            telemetry_path: self.telemetry_path.clone(),
            endpoint: self.endpoint.clone(),
            auto_scrape: self.auto_scrape.then_some(true),
            insecure_skip_verify: self.insecure_skip_verify.then_some(true),
            log_level: self.log_level.clone(),
            log_format: self.log_format.as_deref().map(|f| match f {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.overrides())?;

    init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "weight-exporter starting");
    tracing::info!(
        listen_address = %config.server.listen_address,
        endpoint = %config.upstream.endpoint,
        auto_scrape = config.refresh.auto_scrape,
        "Configuration loaded"
    );

    let listen_address = normalize_listen_address(&config.server.listen_address);
    let server = ExporterServer::new(config)?;

    let listener = TcpListener::bind(&listen_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(()) => shutdown.trigger(),
            Err(e) => {
                // Dropping `shutdown` would close the channel and stop the server.
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
