//! Health model shared by probes, the cache and the registry
//!
//! A probe is handed a [HealthCheckContext] naming the [HealthCheckRegistration]
//! it runs under and replies with a [HealthCheckResult].
pub mod context;
pub mod result;

pub use context::{HealthCheckContext, HealthCheckRegistration};
pub use result::{HealthCheckResult, HealthStatus};
