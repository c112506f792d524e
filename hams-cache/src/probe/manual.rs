/// Manual probe provides a probe that is explicitly enabled and disabled.
use async_trait::async_trait;
use log::debug;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};
use tokio_util::sync::CancellationToken;

use super::AsyncHealthProbe;
use crate::error::HamsError;
use crate::health::{HealthCheckContext, HealthCheckResult};

#[derive(Debug)]
struct Inner {
    enabled: bool,
    failure: Option<String>,
    delay: Option<Duration>,
}

/// A probe that is manually controlled. Allowing the developer to
/// enable, disable, toggle or fail it as appropriate.
///
/// Clones share state, so a clone can be registered while the original is
/// kept to drive it. Every check is counted.
#[derive(Debug, Clone)]
pub struct Manual {
    name: String,
    inner: Arc<Mutex<Inner>>,
    checks: Arc<AtomicUsize>,
}

impl Manual {
    /// Create a new Manual probe with the given name and enabled state
    pub fn new<S: Into<String>>(name: S, enabled: bool) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(Mutex::new(Inner {
                enabled,
                failure: None,
                delay: None,
            })),
            checks: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enable the probe
    pub fn enable(&self) {
        self.inner().enabled = true;
    }

    /// Disable the probe
    pub fn disable(&self) {
        self.inner().enabled = false;
    }

    /// Toggle the probe
    pub fn toggle(&self) -> bool {
        let mut inner = self.inner();
        inner.enabled = !inner.enabled;
        inner.enabled
    }

    /// Make every following check fail with `msg`
    pub fn fail<S: Into<String>>(&self, msg: S) {
        self.inner().failure = Some(msg.into());
    }

    /// Stop failing checks
    pub fn recover(&self) {
        self.inner().failure = None;
    }

    /// Wait `delay` before replying to each check
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.inner().delay = delay;
    }

    /// Number of checks performed so far
    pub fn count(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AsyncHealthProbe for Manual {
    type Reply = HealthCheckResult;
    type Error = HamsError;

    async fn check(
        &self,
        _context: &HealthCheckContext,
        cancel: &CancellationToken,
    ) -> Result<HealthCheckResult, HamsError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        debug!("Manual probe {} checked", self.name);

        let delay = self.inner().delay;
        if let Some(delay) = delay {
            tokio::select! {
                _ = cancel.cancelled() => return Err(HamsError::Cancelled),
                _ = tokio::time::sleep(delay) => {},
            }
        }

        let inner = self.inner();
        match (&inner.failure, inner.enabled) {
            (Some(msg), _) => Err(HamsError::Message(msg.clone())),
            (None, true) => Ok(HealthCheckResult::healthy()),
            (None, false) => Ok(HealthCheckResult::unhealthy(format!(
                "{} disabled",
                self.name
            ))),
        }
    }
}
