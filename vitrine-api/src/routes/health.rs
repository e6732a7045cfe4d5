//! Health Check Endpoints
//!
//! - /health/ping - Simple liveness check
//! - /health/live - Process alive check
//! - /health/ready - Dataset reachable, with cache statistics
//!
//! No authentication required for health endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vitrine_storage::{CacheStats, StatsCache};

use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDetails {
    pub dataset: ComponentHealth,
    pub cache: CacheHealth,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Snapshot of the stats cache.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheHealth {
    /// Whether a summary is currently stored
    pub cached: bool,
    /// Whether a recompute is running
    pub computing: bool,
    pub generation: u64,
    /// Modification time the stored summary was computed against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub stats: CacheStats,
}

impl CacheHealth {
    pub fn from_cache(cache: &StatsCache) -> Self {
        Self {
            cached: cache.peek().is_some(),
            computing: cache.is_computing(),
            generation: cache.generation(),
            last_modified: cache.last_modified(),
            stats: cache.stats(),
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping - Simple pong response
#[utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    ),
)]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/live - Process liveness check
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
)]
pub async fn liveness() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Process is alive".to_string()),
        details: None,
    };
    (StatusCode::OK, Json(response))
}

/// GET /health/ready - Readiness check
///
/// Ready when the dataset's modification time can be read.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Dataset unavailable", body = HealthResponse),
    ),
)]
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let dataset = match state.store.modification_time().await {
        Some(modified) => ComponentHealth {
            status: HealthStatus::Healthy,
            last_modified: Some(modified),
            error: None,
        },
        None => ComponentHealth {
            status: HealthStatus::Unhealthy,
            last_modified: None,
            error: Some("Dataset modification time unavailable".to_string()),
        },
    };

    let status = dataset.status;
    let response = HealthResponse {
        status,
        message: match status {
            HealthStatus::Healthy => None,
            HealthStatus::Unhealthy => Some("Dataset unavailable".to_string()),
        },
        details: Some(HealthDetails {
            dataset,
            cache: CacheHealth::from_cache(&state.cache),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.uptime_secs(),
        }),
    };

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => {
            tracing::warn!("Readiness check failed: dataset unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status_code, Json(response))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the health check router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&HealthStatus::Healthy)?, "\"healthy\"");
        assert_eq!(serde_json::to_string(&HealthStatus::Unhealthy)?, "\"unhealthy\"");
        Ok(())
    }

    #[test]
    fn test_liveness_response_omits_details() -> Result<(), serde_json::Error> {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            message: None,
            details: None,
        };
        assert_eq!(serde_json::to_string(&response)?, r#"{"status":"healthy"}"#);
        Ok(())
    }
}
