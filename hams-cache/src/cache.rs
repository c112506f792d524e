//! Time-to-live caching of probe replies

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use log::trace;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::health::HealthCheckContext;
use crate::probe::AsyncHealthProbe;

/// Last reply of the inner probe and when it was requested
struct CacheSlot<R> {
    /// None until the first refresh starts
    updated_at: Option<SystemTime>,
    /// None until a refresh succeeds
    last: Option<R>,
}

impl<R: Clone> CacheSlot<R> {
    fn fresh(&self, ttl: Duration, now: SystemTime) -> Option<R> {
        let updated_at = self.updated_at?;
        let live = match updated_at.checked_add(ttl) {
            Some(expires_at) => now < expires_at,
            None => true,
        };
        if live {
            self.last.clone()
        } else {
            None
        }
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Wraps a probe so that it is only run once per time-to-live window.
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Empty
///     Empty --> Populated: check (miss)
///     Populated --> Populated: check within ttl (hit)
///     Populated --> Populated: check after ttl (miss)
/// ```
///
/// A check within `ttl` of the start of the last refresh returns the cached
/// reply. Any other check stamps the slot with the clock, runs the inner
/// probe and stores its reply. The window starts when the refresh starts, so
/// a slow inner probe does not extend it. A zero `ttl` never serves from the
/// cache.
///
/// Failures of the inner probe are returned unchanged and are not cached: the
/// previous reply, if any, is kept and served until the window closes. A
/// failing first check leaves nothing to serve so the next check runs the
/// inner probe again.
///
/// The decision and refresh run under one async lock, so concurrent checks
/// never run the inner probe twice for the same window.
pub struct CachedHealthProbe<P: AsyncHealthProbe> {
    inner: P,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<CacheSlot<P::Reply>>,
}

impl<P: AsyncHealthProbe> CachedHealthProbe<P> {
    pub fn new(inner: P, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            ttl,
            clock,
            slot: Mutex::new(CacheSlot {
                updated_at: None,
                last: None,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: AsyncHealthProbe> AsyncHealthProbe for CachedHealthProbe<P> {
    type Reply = P::Reply;
    type Error = P::Error;

    async fn check(
        &self,
        context: &HealthCheckContext,
        cancel: &CancellationToken,
    ) -> Result<P::Reply, P::Error> {
        let mut slot = self.slot.lock().await;

        if let Some(reply) = slot.fresh(self.ttl, self.clock.now()) {
            trace!("cache hit for {}", context.registration.name);
            return Ok(reply);
        }

        trace!("cache miss for {}", context.registration.name);
        slot.updated_at = Some(self.clock.now());

        let reply = self.inner.check(context, cancel).await?;
        slot.last = Some(reply.clone());
        Ok(reply)
    }
}

impl<P: AsyncHealthProbe> fmt::Debug for CachedHealthProbe<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedHealthProbe")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
