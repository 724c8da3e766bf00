//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → optional config file (TOML) via loader.rs
//!     → command-line / environment overrides
//!     → validation.rs (semantic checks)
//!     → ExporterConfig (validated, immutable)
//!     → handed to subsystems at construction
//! ```
//!
//! # Design Decisions
//! - Config is resolved once at startup; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigOverrides};
pub use schema::{
    ExporterConfig, LogFormat, MetricsConfig, ObservabilityConfig, RefreshConfig, ServerConfig,
    UpstreamConfig,
};
