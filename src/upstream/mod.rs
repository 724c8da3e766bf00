//! Upstream API access.
//!
//! # Data Flow
//! ```text
//! probe.rs: GET <endpoint><probe_path>
//!     → headers.rs (x-mbx-used-weight, x-mbx-used-weight-1m)
//!     → ObservationCache (success or failure)
//! ```

pub mod headers;
pub mod probe;

pub use probe::UpstreamProbe;
