//! Registry of named health probes
//!
//! The registry is the host for [CachedHealthProbe]s: it owns the
//! registration metadata (tags, failure status, timeout), runs the selected
//! probes concurrently and summarises their replies in a [HealthReport].

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use futures::future::join_all;
use log::{debug, info, warn};
use serde::Serialize;
use serde_with::{serde_as, DurationMilliSeconds};
use tokio_util::sync::CancellationToken;

use crate::cache::CachedHealthProbe;
use crate::clock::{Clock, SystemClock};
use crate::config::CachedProbeConfig;
use crate::error::HamsError;
use crate::health::{HealthCheckContext, HealthCheckRegistration, HealthCheckResult, HealthStatus};
use crate::probe::AsyncHealthProbe;

/// Type erased probe as held by the registry
pub type BoxedHealthProbe =
    Arc<dyn AsyncHealthProbe<Reply = HealthCheckResult, Error = HamsError>>;

struct Entry {
    registration: HealthCheckRegistration,
    probe: BoxedHealthProbe,
}

/// Reply for a single registration within a [HealthReport]
#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct HealthReportEntry {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "duration_ms")]
    pub duration: Duration,
}

/// Summary of a check across a set of registrations
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub name: String,
    /// Worst status of all entries, Healthy when there are none
    pub status: HealthStatus,
    pub entries: Vec<HealthReportEntry>,
}

impl HealthReport {
    fn new(name: String, entries: Vec<HealthReportEntry>) -> Self {
        let status = entries
            .iter()
            .map(|entry| entry.status)
            .min()
            .unwrap_or(HealthStatus::Healthy);

        Self {
            name,
            status,
            entries,
        }
    }

    pub fn entry(&self, name: &str) -> Option<&HealthReportEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

#[cfg(feature = "warp")]
impl warp::Reply for HealthReport {
    fn into_response(self) -> warp::reply::Response {
        let status = match self.status {
            HealthStatus::Healthy | HealthStatus::Degraded => warp::http::StatusCode::OK,
            HealthStatus::Unhealthy => warp::http::StatusCode::SERVICE_UNAVAILABLE,
        };
        warp::reply::with_status(warp::reply::json(&self), status).into_response()
    }
}

/// Collection of named probes which can be checked together.
///
/// Clones share the same registrations and cancellation token.
#[derive(Clone)]
pub struct HealthChecks {
    pub name: String,
    entries: Arc<RwLock<Vec<Entry>>>,
    cancel: CancellationToken,
}

impl HealthChecks {
    /// Create a new empty registry with a name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            entries: Arc::new(RwLock::new(Vec::new())),
            cancel: CancellationToken::new(),
        }
    }

    /// Register a probe. Names must be unique.
    pub fn add<P>(&self, registration: HealthCheckRegistration, probe: P) -> Result<(), HamsError>
    where
        P: AsyncHealthProbe<Reply = HealthCheckResult, Error = HamsError> + 'static,
    {
        let mut entries = self.write();
        if entries
            .iter()
            .any(|entry| entry.registration.name == registration.name)
        {
            return Err(HamsError::DuplicateName(registration.name));
        }

        info!("Registering probe {} in {}", registration.name, self.name);
        entries.push(Entry {
            registration,
            probe: Arc::new(probe),
        });
        Ok(())
    }

    /// Register a probe behind a [CachedHealthProbe] so it runs at most once per `ttl`.
    ///
    /// The wall clock is used unless a `clock` is given.
    pub fn add_cached<P>(
        &self,
        registration: HealthCheckRegistration,
        probe: P,
        ttl: Duration,
        clock: Option<Arc<dyn Clock>>,
    ) -> Result<(), HamsError>
    where
        P: AsyncHealthProbe<Reply = HealthCheckResult, Error = HamsError> + 'static,
    {
        let clock = clock.unwrap_or_else(|| Arc::new(SystemClock));
        debug!("Caching probe {} for {:?}", registration.name, ttl);
        self.add(registration, CachedHealthProbe::new(probe, ttl, clock))
    }

    /// Register a cached probe as described by configuration, using the wall clock
    pub fn add_cached_from_config<P>(
        &self,
        config: &CachedProbeConfig,
        probe: P,
    ) -> Result<(), HamsError>
    where
        P: AsyncHealthProbe<Reply = HealthCheckResult, Error = HamsError> + 'static,
    {
        self.add_cached(config.registration(), probe, config.ttl, None)
    }

    /// Remove a registration by name
    pub fn remove(&self, name: &str) -> bool {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|entry| entry.registration.name != name);
        before != entries.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Cancel all in-flight and future checks
    pub fn cancel(&self) {
        info!("Cancelling checks for {}", self.name);
        self.cancel.cancel();
    }

    /// Run every registration accepted by `predicate` and report on them
    pub async fn check<F>(&self, predicate: F) -> HealthReport
    where
        F: Fn(&HealthCheckRegistration) -> bool,
    {
        let selected = self.select(predicate);

        let checks = selected
            .into_iter()
            .map(|(registration, probe)| run_entry(registration, probe, self.cancel.child_token()));
        let entries = join_all(checks).await;

        let report = HealthReport::new(self.name.clone(), entries);
        debug!("Check of {} is {}", self.name, report.status);
        report
    }

    /// Run every registration
    pub async fn check_all(&self) -> HealthReport {
        self.check(|_| true).await
    }

    fn select<F>(&self, predicate: F) -> Vec<(HealthCheckRegistration, BoxedHealthProbe)>
    where
        F: Fn(&HealthCheckRegistration) -> bool,
    {
        self.read()
            .iter()
            .filter(|entry| predicate(&entry.registration))
            .map(|entry| (entry.registration.clone(), entry.probe.clone()))
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Entry>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Entry>> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn run_entry(
    registration: HealthCheckRegistration,
    probe: BoxedHealthProbe,
    cancel: CancellationToken,
) -> HealthReportEntry {
    let context = HealthCheckContext::new(registration.clone());
    let start = Instant::now();

    let outcome = match registration.timeout {
        Some(timeout) => {
            match tokio::time::timeout(timeout, probe.check(&context, &cancel)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    cancel.cancel();
                    Err(HamsError::Timeout(timeout))
                }
            }
        }
        None => probe.check(&context, &cancel).await,
    };

    let result = outcome.unwrap_or_else(|error| {
        warn!("Probe {} failed: {}", registration.name, error);
        HealthCheckResult::new(registration.failure_status(), Some(error.to_string()))
    });

    HealthReportEntry {
        name: registration.name,
        status: result.status,
        description: result.description,
        duration: start.elapsed(),
    }
}
