//! Prometheus Metrics Definitions
//!
//! Defines all VITRINE metrics with appropriate labels and types.
//! Exposes a /metrics endpoint for Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_counter, CounterVec, Encoder,
    HistogramVec, IntCounter, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance - initialized on first use
pub static METRICS: Lazy<ApiResult<VitrineMetrics>> = Lazy::new(VitrineMetrics::new);

/// Run `f` against the global metrics if they registered successfully.
pub fn with_metrics(f: impl FnOnce(&VitrineMetrics)) {
    match METRICS.as_ref() {
        Ok(metrics) => f(metrics),
        Err(e) => tracing::debug!(error = %e, "Metrics unavailable"),
    }
}

/// Container for all VITRINE metrics.
#[derive(Clone)]
pub struct VitrineMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Stats reads - labels: cache (HIT/MISS)
    pub stats_reads_total: CounterVec,

    /// Forced stats refreshes
    pub stats_refreshes_total: IntCounter,

    /// Items created through the API
    pub items_created_total: IntCounter,
}

impl VitrineMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "vitrine_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "vitrine_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            stats_reads_total: register_counter_vec!(
                "vitrine_stats_reads_total",
                "Stats reads by cache outcome",
                &["cache"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register stats_reads_total: {}", e)))?,

            stats_refreshes_total: register_int_counter!(
                "vitrine_stats_refreshes_total",
                "Forced stats cache refreshes"
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register stats_refreshes_total: {}", e)))?,

            items_created_total: register_int_counter!(
                "vitrine_items_created_total",
                "Items created through the API"
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register items_created_total: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a stats read with its `HIT`/`MISS` outcome.
    pub fn record_stats_read(&self, cache_status: &str) {
        self.stats_reads_total
            .with_label_values(&[cache_status])
            .inc();
    }

    pub fn record_stats_refresh(&self) {
        self.stats_refreshes_total.inc();
    }

    pub fn record_item_created(&self) {
        self.items_created_total.inc();
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler() -> impl IntoResponse {
    // Touch the registry so an idle server still exports its metric families.
    with_metrics(|_| {});

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::core::Collector;

    #[test]
    fn test_metrics_creation() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        assert!(!metrics.http_requests_total.desc().is_empty());
        Ok(())
    }

    #[test]
    fn test_record_stats_reads() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        let before = metrics.stats_reads_total.with_label_values(&["HIT"]).get();
        metrics.record_stats_read("HIT");
        let after = metrics.stats_reads_total.with_label_values(&["HIT"]).get();
        assert!(after >= before + 1.0);
        Ok(())
    }

    #[test]
    fn test_record_http_request_and_counters() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        metrics.record_http_request("GET", "/api/items/{id}", 200, 0.015);
        metrics.record_stats_refresh();
        metrics.record_item_created();
        assert!(metrics.items_created_total.get() >= 1);
        Ok(())
    }
}
