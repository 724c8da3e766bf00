//! Upstream API weight exporter library.
//!
//! Probes an upstream HTTP API, reads its used-weight rate-limit headers and
//! exposes them as Prometheus gauges.

pub mod collector;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::ExporterConfig;
pub use error::ExporterError;
pub use http::ExporterServer;
pub use lifecycle::Shutdown;
