//! OpenAPI document for the VITRINE API
//!
//! Generated with utoipa from the route annotations and the schema derives
//! on the domain types.

use utoipa::openapi::Server;
use utoipa::{Modify, OpenApi};

use vitrine_core::{Item, ItemPage, NewItem, Pagination, PriceRange, StatsSummary};

use crate::constants::DEV_SERVER_URL;
use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{CacheHealth, ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use crate::routes::stats::RefreshResponse;
use crate::routes::{health, items, stats};
use crate::telemetry::metrics;

/// OpenAPI document for VITRINE API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VITRINE API",
        description = "Catalog items with search, pagination, and cached dataset statistics",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "Items", description = "Catalog items"),
        (name = "Stats", description = "Cached dataset statistics"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        items::list_items,
        items::get_item,
        items::create_item,
        stats::get_stats,
        stats::refresh_stats,
        health::ping,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(schemas(
        Item,
        NewItem,
        ItemPage,
        Pagination,
        StatsSummary,
        PriceRange,
        RefreshResponse,
        ApiError,
        ErrorCode,
        HealthResponse,
        HealthStatus,
        HealthDetails,
        ComponentHealth,
        CacheHealth,
    )),
    modifiers(&ServerAddon)
)]
pub struct ApiDoc;

/// Adds the local development server.
struct ServerAddon;

impl Modify for ServerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .servers
            .get_or_insert_with(Vec::new)
            .push(Server::new(DEV_SERVER_URL));
    }
}

impl ApiDoc {
    /// Render the OpenAPI document as JSON.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
