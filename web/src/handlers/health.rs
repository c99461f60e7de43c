//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check collaborators.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Health of a single component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum HealthStatus {
    /// Fully operational
    Healthy,
    /// Operational with a fallback in place
    Degraded,
    /// Cannot serve requests
    Unhealthy,
}

/// Result of checking one component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    /// Component name
    pub component: String,
    /// Its status
    pub status: HealthStatus,
    /// Human-readable detail
    pub message: String,
}

impl ComponentHealth {
    /// Build a component report.
    #[must_use]
    pub fn new(component: impl Into<String>, status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status,
            message: message.into(),
        }
    }
}

/// Aggregated readiness report.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    /// Worst status among the components
    pub status: HealthStatus,
    /// Individual component results
    pub components: Vec<ComponentHealth>,
}

/// Application state that can report its readiness.
pub trait ReadinessProbe: Clone + Send + Sync + 'static {
    /// Check every component.
    fn readiness(&self) -> Vec<ComponentHealth>;
}

/// Readiness check aggregating every component of the application state.
///
/// # Status Codes
///
/// - 200 OK: Healthy or Degraded
/// - 503 Service Unavailable: any component Unhealthy
///
/// # Endpoint
///
/// ```text
/// GET /ready
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "Degraded",
///   "components": [
///     { "component": "notifier", "status": "Degraded", "message": "console notifier" }
///   ]
/// }
/// ```
#[allow(clippy::unused_async)]
pub async fn readiness_check<P: ReadinessProbe>(
    State(probe): State<P>,
) -> (StatusCode, Json<ReadinessReport>) {
    let components = probe.readiness();
    let status = components
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Healthy);

    let code = match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (code, Json(ReadinessReport { status, components }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Probe(Vec<HealthStatus>);

    impl ReadinessProbe for Probe {
        fn readiness(&self) -> Vec<ComponentHealth> {
            self.0
                .iter()
                .enumerate()
                .map(|(i, s)| ComponentHealth::new(format!("c{i}"), *s, "test"))
                .collect()
        }
    }

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn degraded_component_is_still_ready() {
        let probe = Probe(vec![HealthStatus::Healthy, HealthStatus::Degraded]);
        let (status, Json(report)) = readiness_check(State(probe)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report.status, HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn unhealthy_component_fails_readiness() {
        let probe = Probe(vec![HealthStatus::Unhealthy, HealthStatus::Healthy]);
        let (status, Json(report)) = readiness_check(State(probe)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.components.len(), 2);
    }
}
