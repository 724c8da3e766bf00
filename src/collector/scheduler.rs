//! Refresh strategies: when the upstream gets probed.
//!
//! # Strategies
//! - `OnDemand`: every scrape probes the upstream and waits for the result
//! - `FixedRate`: a background task probes once per period, aligned to a fixed
//!   second of the wall-clock minute; scrapes only read the cache
//!
//! # Design Decisions
//! - Exactly one strategy is active, chosen once at startup
//! - Alignment is computed once; a fixed-period timer takes over afterwards
//! - Missed ticks are skipped rather than burst, to keep the phase

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::RefreshConfig;
use crate::upstream::UpstreamProbe;

/// Which scheduling mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    OnDemand,
    FixedRate,
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshMode::OnDemand => write!(f, "on-demand"),
            RefreshMode::FixedRate => write!(f, "fixed-rate"),
        }
    }
}

/// Ensures an observation is available before a scrape reads the cache.
#[async_trait]
pub trait RefreshStrategy: Send + Sync {
    /// Called once per scrape, before the collector runs.
    async fn prepare(&self);

    fn mode(&self) -> RefreshMode;
}

/// Probe synchronously on every scrape.
pub struct OnDemand {
    probe: UpstreamProbe,
}

impl OnDemand {
    pub fn new(probe: UpstreamProbe) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl RefreshStrategy for OnDemand {
    async fn prepare(&self) {
        self.probe.probe().await;
    }

    fn mode(&self) -> RefreshMode {
        RefreshMode::OnDemand
    }
}

/// Probe in the background on a wall-clock-aligned fixed rate.
#[derive(Clone)]
pub struct FixedRate {
    probe: UpstreamProbe,
    period: Duration,
    align_second: u32,
}

impl FixedRate {
    pub fn new(probe: UpstreamProbe, config: &RefreshConfig) -> Self {
        Self {
            probe,
            period: Duration::from_secs(config.period_secs),
            align_second: config.align_second,
        }
    }

    /// Run a single probe outside the schedule.
    pub async fn refresh_once(&self) {
        self.probe.probe().await;
    }

    /// Start the background refresh loop.
    pub fn spawn(&self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.run(shutdown).await })
    }

    async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let now = Utc::now();
        let first = next_aligned_instant(now, self.align_second);
        let delay = (first - now).to_std().unwrap_or_default();

        tracing::info!(
            first_run = %first,
            period_secs = self.period.as_secs(),
            "Started schedule"
        );

        let mut ticker = time::interval_at(Instant::now() + delay, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.probe.probe().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Refresh task received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl RefreshStrategy for FixedRate {
    async fn prepare(&self) {}

    fn mode(&self) -> RefreshMode {
        RefreshMode::FixedRate
    }
}

/// First instant strictly after `now` whose second-of-minute is `second`.
pub fn next_aligned_instant(now: DateTime<Utc>, second: u32) -> DateTime<Utc> {
    let whole_second = now - chrono::Duration::nanoseconds(i64::from(now.nanosecond() % 1_000_000_000));
    let offset = (i64::from(second) - i64::from(now.second())).rem_euclid(60);
    let offset = if offset == 0 { 60 } else { offset };
    whole_second + chrono::Duration::seconds(offset)
}
