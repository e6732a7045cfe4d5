//! Stats REST API Routes
//!
//! Serves the cached dataset summary and the forced refresh.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vitrine_core::StatsSummary;
use vitrine_storage::StatsCache;

use crate::constants::CACHE_STATUS_HEADER;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::telemetry::metrics::with_metrics;

/// Body returned by a forced refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    /// Always `Cache refreshed`
    pub message: String,
    pub stats: StatsSummary,
}

impl RefreshResponse {
    pub fn new(stats: StatsSummary) -> Self {
        Self {
            message: "Cache refreshed".to_string(),
            stats,
        }
    }
}

/// GET /api/stats - Dataset summary
///
/// The `X-Cache` header is `HIT` when the summary came from the cache and
/// `MISS` when this request recomputed it or waited for a recompute.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Stats",
    responses(
        (status = 200, description = "Dataset summary", body = StatsSummary,
            headers(("x-cache" = String, description = "HIT or MISS"))),
        (status = 500, description = "Dataset unavailable", body = ApiError),
    ),
)]
pub async fn get_stats(State(cache): State<Arc<StatsCache>>) -> ApiResult<Response> {
    let read = cache.read().await?;
    let status = read.status();
    with_metrics(|m| m.record_stats_read(status.as_str()));

    let summary = StatsSummary::clone(read.value());
    let mut response = Json(summary).into_response();
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(status.as_str()));
    Ok(response)
}

/// POST /api/stats/refresh - Recompute the summary now
#[utoipa::path(
    post,
    path = "/api/stats/refresh",
    tag = "Stats",
    responses(
        (status = 200, description = "Freshly computed summary", body = RefreshResponse),
        (status = 500, description = "Dataset unavailable", body = ApiError),
    ),
)]
pub async fn refresh_stats(State(cache): State<Arc<StatsCache>>) -> ApiResult<Json<RefreshResponse>> {
    let summary = cache.refresh().await?;
    with_metrics(|m| m.record_stats_refresh());
    tracing::info!(total = summary.total, "Stats refreshed on request");

    Ok(Json(RefreshResponse::new(StatsSummary::clone(&summary))))
}

/// Create the stats router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_stats))
        .route("/refresh", post(refresh_stats))
}
