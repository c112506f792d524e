use warp::Filter;

use crate::registry::HealthChecks;

/// Serve `GET /health` from the registrations carrying `tag`, or all of them when `tag` is None
pub fn health_service(
    checks: HealthChecks,
    tag: Option<String>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_checks(checks))
        .and(warp::any().map(move || tag.clone()))
        .and_then(handlers::health_handler)
}

fn with_checks(
    checks: HealthChecks,
) -> impl Filter<Extract = (HealthChecks,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || checks.clone())
}

mod handlers {
    use super::HealthChecks;
    use crate::health::HealthCheckRegistration;
    use std::convert::Infallible;

    /// Handler for health endpoint
    pub async fn health_handler(
        checks: HealthChecks,
        tag: Option<String>,
    ) -> Result<impl warp::Reply, Infallible> {
        let report = checks
            .check(|registration: &HealthCheckRegistration| {
                tag.as_deref().map_or(true, |tag| registration.has_tag(tag))
            })
            .await;

        Ok(report)
    }

}
