//! Latest upstream observation and its shared cache.
//!
//! # State Transitions
//! ```text
//! Init → Up:   first successful probe
//! Init → Down: first transport failure
//! Up ⇄ Down:   every subsequent probe
//! ```
//!
//! # Design Decisions
//! - Observations are immutable snapshots swapped in whole, never torn
//! - A failed probe keeps the previous weights; only `reachable` flips
//! - Reads never wait on an in-flight probe

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

/// Result of the most recent probe.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observation {
    /// Whether the last probe reached the upstream.
    pub reachable: bool,
    /// Legacy `x-mbx-used-weight` value from the last successful probe.
    pub weight_used: f64,
    /// `x-mbx-used-weight-1m` value from the last successful probe.
    pub weight_used_1m: f64,
    /// When the last probe completed; `None` until the first one does.
    pub observed_at: Option<DateTime<Utc>>,
}

/// Coarse upstream state derived from an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Init,
    Up,
    Down,
}

impl Observation {
    pub fn state(&self) -> ProbeState {
        match (self.observed_at, self.reachable) {
            (None, _) => ProbeState::Init,
            (Some(_), true) => ProbeState::Up,
            (Some(_), false) => ProbeState::Down,
        }
    }

    /// Seconds elapsed between the observation and `now`.
    pub fn age_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        self.observed_at.map(|at| (now - at).num_seconds())
    }
}

/// Thread-safe holder of the latest [`Observation`].
///
/// Cloning is cheap and every clone shares the same snapshot.
#[derive(Clone)]
pub struct ObservationCache {
    inner: Arc<ArcSwap<Observation>>,
}

impl ObservationCache {
    /// Create a cache holding the initial zero observation.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(Observation::default())),
        }
    }

    /// Current snapshot.
    pub fn read(&self) -> Arc<Observation> {
        self.inner.load_full()
    }

    /// Replace the stored observation unconditionally.
    pub fn write(&self, observation: Observation) -> ProbeState {
        let previous = self.inner.swap(Arc::new(observation));
        previous.state()
    }

    /// Store a successful probe. Returns the state before the write.
    pub fn record_success(&self, weight_used: f64, weight_used_1m: f64) -> ProbeState {
        self.write(Observation {
            reachable: true,
            weight_used,
            weight_used_1m,
            observed_at: Some(Utc::now()),
        })
    }

    /// Mark the upstream unreachable while keeping the cached weights.
    /// Returns the state before the write.
    pub fn record_failure(&self) -> ProbeState {
        let now = Utc::now();
        let previous = self.inner.rcu(|current| Observation {
            reachable: false,
            observed_at: Some(now),
            ..Observation::clone(current)
        });
        previous.state()
    }

    pub fn state(&self) -> ProbeState {
        self.inner.load().state()
    }
}

impl Default for ObservationCache {
    fn default() -> Self {
        Self::new()
    }
}
