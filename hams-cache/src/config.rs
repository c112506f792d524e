use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::time::Duration;

use crate::health::{HealthCheckRegistration, HealthStatus};

/// Configuration of a cached probe registration
#[serde_as]
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CachedProbeConfig {
    /// Name the probe is registered under
    pub name: String,
    /// How long a reply is served from cache, in seconds
    #[serde_as(as = "DurationSeconds<u64>")]
    pub ttl: Duration,
    /// Tags used to select the probe when checking
    pub tags: Vec<String>,
    /// Maximum time allowed for the probe to reply, in seconds
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub timeout: Option<Duration>,
    /// Status reported when the probe fails
    pub failure_status: Option<HealthStatus>,
}

impl Default for CachedProbeConfig {
    fn default() -> Self {
        Self {
            name: "NO_NAME".to_string(),
            ttl: Duration::from_secs(30),
            tags: Vec::new(),
            timeout: None,
            failure_status: None,
        }
    }
}

impl CachedProbeConfig {
    /// Registration described by this configuration
    pub fn registration(&self) -> HealthCheckRegistration {
        HealthCheckRegistration::new(self.name.clone())
            .with_failure_status(self.failure_status)
            .with_tags(self.tags.iter().cloned())
            .with_timeout(self.timeout)
    }
}
