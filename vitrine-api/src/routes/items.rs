//! Item REST API Routes
//!
//! Listing with search and pagination, lookup by id, and creation.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use vitrine_core::{find_item, list_items as list_page, Item, ItemPage, ListItemsQuery, NewItem};
use vitrine_storage::InvalidationSource;

use crate::error::{ApiError, ApiResult};
use crate::extractors::ItemIdPath;
use crate::state::AppState;
use crate::telemetry::metrics::with_metrics;

/// GET /api/items - List items with optional search and pagination
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Items",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Page of matching items", body = ItemPage),
        (status = 400, description = "Invalid limit, page, or query string", body = ApiError),
        (status = 500, description = "Dataset unavailable", body = ApiError),
    ),
)]
pub async fn list_items(
    State(state): State<AppState>,
    query: Result<Query<ListItemsQuery>, QueryRejection>,
) -> ApiResult<Json<ItemPage>> {
    let Query(query) = query?;
    let items = state.store.read_all().await?;

    let page = list_page(
        &items,
        &query,
        state.config.default_page_size,
        state.config.max_page_size,
    )?;

    tracing::debug!(
        q = query.search_term(),
        returned = page.items.len(),
        total = page.pagination.total_items,
        "Listed items"
    );
    Ok(Json(page))
}

/// GET /api/items/{id} - Get a single item
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    tag = "Items",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = Item),
        (status = 400, description = "Id is not an integer", body = ApiError),
        (status = 404, description = "Item not found", body = ApiError),
    ),
)]
pub async fn get_item(
    State(state): State<AppState>,
    ItemIdPath(id): ItemIdPath,
) -> ApiResult<Json<Item>> {
    let items = state.store.read_all().await?;
    find_item(&items, id)
        .cloned()
        .map(Json)
        .ok_or_else(ApiError::item_not_found)
}

/// POST /api/items - Create a new item
///
/// The server assigns the id. Fields beyond the known ones are dropped.
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Malformed request body", body = ApiError),
        (status = 500, description = "Dataset unavailable", body = ApiError),
    ),
)]
pub async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<NewItem>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let Json(new_item) = body?;

    let item = state.store.append(new_item).await?;
    // Don't wait for the watcher.
    state.cache.invalidate(InvalidationSource::Manual)?;

    with_metrics(|m| m.record_item_created());
    tracing::info!(id = item.id, name = %item.name, "Item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Create the items router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item))
}
