//! REST API Routes Module
//!
//! - Item listing, lookup, and creation under `/api/items`
//! - Cached dataset statistics under `/api/stats`
//! - Health check endpoints (Kubernetes-compatible)
//! - Prometheus metrics and the OpenAPI document
//! - CORS support for browser-based clients

pub mod health;
pub mod items;
pub mod stats;

use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, Uri},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::constants::CACHE_STATUS_HEADER;
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// JSON 404 for anything no route matched.
async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::route_not_found(uri.path())
}

/// Build CORS layer from configuration.
///
/// Empty origin list means every origin is allowed (development).
pub fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([HeaderName::from_static(CACHE_STATUS_HEADER)])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: allowing configured origins");
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}

/// Create the complete API router.
///
/// `/metrics` is only mounted when `metrics_enabled` is set.
pub fn create_api_router(state: AppState, metrics_enabled: bool) -> Router {
    let api_routes = Router::new()
        .nest("/items", items::create_router())
        .nest("/stats", stats::create_router());

    let mut router = Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::create_router())
        .route("/openapi.json", get(openapi_json));

    if metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    let cors = build_cors_layer(&state.config);

    router
        .fallback(route_not_found)
        .with_state(state)
        .layer(from_fn(observability_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
