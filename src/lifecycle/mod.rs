//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Resolve config → Validate → Build server → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → broadcast → server drains, refresh task exits
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and exits non-zero
//! - Probe failures never end the process

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
