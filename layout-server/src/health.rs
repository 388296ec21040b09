//! Health check endpoints.
//!
//! - `/health/live` - process is up
//! - `/health/ready` - template store is usable
//! - `/health` - same as ready

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Overall status: "healthy" or "unhealthy"
    pub status: &'static str,
    /// Server version
    pub version: &'static str,
    /// Individual component checks
    pub checks: HealthChecks,
}

/// Individual health checks.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Template store accessible
    pub template_store: bool,
    /// At least one category configured
    pub categories: bool,
}

impl HealthStatus {
    fn from_checks(checks: HealthChecks) -> Self {
        let healthy = checks.template_store && checks.categories;
        Self {
            status: if healthy { "healthy" } else { "unhealthy" },
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }

    /// Whether every check passed.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Liveness probe.
#[tracing::instrument(name = "liveness_probe")]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe. Fails with 503 if the store lock is poisoned or no
/// categories are configured.
#[tracing::instrument(name = "readiness_probe", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = HealthStatus::from_checks(HealthChecks {
        template_store: state.store.len().is_ok(),
        categories: !state.categories.is_empty(),
    });

    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}
