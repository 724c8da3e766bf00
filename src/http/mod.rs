//! HTTP exposition subsystem.
//!
//! # Data Flow
//! ```text
//! GET <telemetry_path>
//!     → handlers.rs (strategy.prepare, registry.gather, text encode)
//!     → Prometheus text format
//!
//! GET /
//!     → handlers.rs (static landing page)
//! ```

pub mod handlers;
pub mod server;

pub use server::ExporterServer;
