//! Rate-limit telemetry collector.
//!
//! # Data Flow
//! ```text
//! On-demand mode:
//!     scrape → OnDemand::prepare → UpstreamProbe → ObservationCache
//!            → WeightCollector::collect (reads cache)
//!
//! Fixed-rate mode:
//!     background task (second 58 of each minute) → UpstreamProbe → ObservationCache
//!     scrape → WeightCollector::collect (reads cache only)
//! ```
//!
//! # Design Decisions
//! - The cache handle is injected into probe and collector; no globals
//! - Scheduling is a strategy object, not a flag checked by the collector
//! - Probe failures are visible only through the `up` gauge

pub mod observation;
pub mod scheduler;
pub mod weight;

pub use observation::{Observation, ObservationCache, ProbeState};
pub use scheduler::{FixedRate, OnDemand, RefreshMode, RefreshStrategy};
pub use weight::WeightCollector;
