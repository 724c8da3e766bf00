//! Observability subsystem.
//!
//! The exporter's own diagnostics go to logs only; the metrics endpoint is
//! reserved for the upstream weight series.

pub mod logging;

pub use logging::init_logging;
