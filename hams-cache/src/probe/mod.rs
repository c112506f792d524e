use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::health::HealthCheckContext;

/// This module contains the manual probe
pub mod manual;

/// An asynchronous health probe.
///
/// The probe is handed the context it runs under and a cancellation token
/// owned by the caller. It decides for itself whether to observe the token.
/// Probes may be called repeatedly and from concurrent tasks.
#[async_trait]
pub trait AsyncHealthProbe: Send + Sync {
    /// Value produced by a successful check
    type Reply: Clone + Send + Sync;
    /// Error produced by a failing check
    type Error: Send;

    async fn check(
        &self,
        context: &HealthCheckContext,
        cancel: &CancellationToken,
    ) -> Result<Self::Reply, Self::Error>;
}

#[async_trait]
impl<P> AsyncHealthProbe for Arc<P>
where
    P: AsyncHealthProbe + ?Sized,
{
    type Reply = P::Reply;
    type Error = P::Error;

    async fn check(
        &self,
        context: &HealthCheckContext,
        cancel: &CancellationToken,
    ) -> Result<Self::Reply, Self::Error> {
        (**self).check(context, cancel).await
    }
}

#[async_trait]
impl<P> AsyncHealthProbe for Box<P>
where
    P: AsyncHealthProbe + ?Sized,
{
    type Reply = P::Reply;
    type Error = P::Error;

    async fn check(
        &self,
        context: &HealthCheckContext,
        cancel: &CancellationToken,
    ) -> Result<Self::Reply, Self::Error> {
        (**self).check(context, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HamsError;
    use crate::health::{HealthCheckRegistration, HealthCheckResult};

    #[derive(Debug)]
    struct AsyncProbe0 {
        valid: bool,
    }

    #[async_trait]
    impl AsyncHealthProbe for AsyncProbe0 {
        type Reply = HealthCheckResult;
        type Error = HamsError;

        async fn check(
            &self,
            _context: &HealthCheckContext,
            _cancel: &CancellationToken,
        ) -> Result<HealthCheckResult, HamsError> {
            if self.valid {
                Ok(HealthCheckResult::healthy())
            } else {
                Err(HamsError::from("invalid"))
            }
        }
    }

    #[derive(Debug)]
    struct AsyncProbe1;

    #[async_trait]
    impl AsyncHealthProbe for AsyncProbe1 {
        type Reply = HealthCheckResult;
        type Error = HamsError;

        async fn check(
            &self,
            context: &HealthCheckContext,
            _cancel: &CancellationToken,
        ) -> Result<HealthCheckResult, HamsError> {
            Ok(HealthCheckResult::degraded(context.registration.name.clone()))
        }
    }

    /// Create a vec of AsyncHealthProbe and run check on each
    #[tokio::test]
    async fn test_async_health_probe_vec() {
        let context = HealthCheckContext::new(HealthCheckRegistration::new("probes"));
        let cancel = CancellationToken::new();

        let probes: Vec<Box<dyn AsyncHealthProbe<Reply = HealthCheckResult, Error = HamsError>>> = vec![
            Box::new(AsyncProbe0 { valid: true }),
            Box::new(AsyncProbe0 { valid: false }),
            Box::new(AsyncProbe1),
        ];

        let mut results = Vec::new();
        for probe in probes {
            results.push(probe.check(&context, &cancel).await);
        }

        assert_eq!(
            results,
            vec![
                Ok(HealthCheckResult::healthy()),
                Err(HamsError::from("invalid")),
                Ok(HealthCheckResult::degraded("probes")),
            ]
        );
    }

    #[tokio::test]
    async fn test_shared_probe() {
        let context = HealthCheckContext::new(HealthCheckRegistration::new("shared"));
        let cancel = CancellationToken::new();

        let probe = Arc::new(AsyncProbe0 { valid: true });
        let shared = probe.clone();

        assert_eq!(
            shared.check(&context, &cancel).await,
            Ok(HealthCheckResult::healthy())
        );
    }
}
