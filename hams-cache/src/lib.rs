//! Cached health probes for HaMS
//!
//! A [CachedHealthProbe] wraps any [AsyncHealthProbe] and replies from its
//! last result until a time-to-live has passed. Time is read from an injected
//! [Clock] so that expiry can be driven deterministically.
//!
//! [HealthChecks] hosts probes under named registrations, optionally behind a
//! cache, and reports on them together.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod health;
pub mod probe;
pub mod registry;

#[cfg(feature = "warp")]
pub mod webservice;

pub use cache::CachedHealthProbe;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CachedProbeConfig;
pub use error::HamsError;
pub use health::{HealthCheckContext, HealthCheckRegistration, HealthCheckResult, HealthStatus};
pub use probe::{manual::Manual, AsyncHealthProbe};
pub use registry::{BoxedHealthProbe, HealthChecks, HealthReport, HealthReportEntry};

/// Name of the Crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Version of the Crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_identity() {
        assert_eq!(NAME, "hams-cache");
        assert!(!VERSION.is_empty());
    }
}
