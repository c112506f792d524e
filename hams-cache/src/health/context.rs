use std::time::Duration;

use serde::Serialize;

use super::HealthStatus;

/// Describes how a probe is hosted by [crate::HealthChecks].
///
/// Nothing here is used by the probe itself; it is read by the registry when
/// running the probe and reporting on it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckRegistration {
    /// Unique name of the registration
    pub name: String,
    /// Status reported when the probe fails or times out. Defaults to Unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_status: Option<HealthStatus>,
    /// Tags used to select registrations when checking
    pub tags: Vec<String>,
    /// Maximum time allowed for the probe to reply
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl HealthCheckRegistration {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            failure_status: None,
            tags: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_failure_status(mut self, failure_status: Option<HealthStatus>) -> Self {
        self.failure_status = failure_status;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Status to report when the probe fails
    pub fn failure_status(&self) -> HealthStatus {
        self.failure_status.unwrap_or(HealthStatus::Unhealthy)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Context handed to every probe invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckContext {
    pub registration: HealthCheckRegistration,
}

impl HealthCheckContext {
    pub fn new(registration: HealthCheckRegistration) -> Self {
        Self { registration }
    }
}

impl From<HealthCheckRegistration> for HealthCheckContext {
    fn from(registration: HealthCheckRegistration) -> Self {
        Self::new(registration)
    }
}
