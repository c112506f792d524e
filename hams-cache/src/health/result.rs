use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Status reported by a probe.
///
/// Ordered from worst to best so that the status of a group of probes is the
/// minimum of its members.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HealthStatus {
    Unhealthy,
    Degraded,
    Healthy,
}

impl Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HealthStatus::Unhealthy => "Unhealthy",
            HealthStatus::Degraded => "Degraded",
            HealthStatus::Healthy => "Healthy",
        };
        write!(f, "{}", name)
    }
}

/// Reply from a single probe
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckResult {
    /// Status of the probe
    pub status: HealthStatus,
    /// Optional diagnostic text
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl HealthCheckResult {
    pub fn new(status: HealthStatus, description: Option<String>) -> Self {
        Self {
            status,
            description,
        }
    }

    pub fn healthy() -> Self {
        Self::new(HealthStatus::Healthy, None)
    }

    pub fn degraded<S: Into<String>>(description: S) -> Self {
        Self::new(HealthStatus::Degraded, Some(description.into()))
    }

    pub fn unhealthy<S: Into<String>>(description: S) -> Self {
        Self::new(HealthStatus::Unhealthy, Some(description.into()))
    }
}

impl Display for HealthCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}/{}", self.status, description),
            None => write!(f, "{}", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ordering() {
        assert!(HealthStatus::Unhealthy < HealthStatus::Degraded);
        assert!(HealthStatus::Degraded < HealthStatus::Healthy);

        let worst = [HealthStatus::Healthy, HealthStatus::Degraded]
            .into_iter()
            .min();
        assert_eq!(worst, Some(HealthStatus::Degraded));
    }

    #[test]
    fn display_of_result() {
        assert_eq!("Healthy", HealthCheckResult::healthy().to_string());
        assert_eq!(
            "Unhealthy/no route",
            HealthCheckResult::unhealthy("no route").to_string()
        );
    }

    #[test]
    fn serialize_result() {
        let json = serde_json::to_string(&HealthCheckResult::healthy()).unwrap();
        assert_eq!(json, r#"{"status":"Healthy"}"#);

        let json = serde_json::to_string(&HealthCheckResult::degraded("slow")).unwrap();
        assert_eq!(json, r#"{"status":"Degraded","description":"slow"}"#);
    }
}
