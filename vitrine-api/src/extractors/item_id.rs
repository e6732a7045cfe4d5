//! Path extractor for integer item ids.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use vitrine_core::{parse_item_id, ItemId};

use crate::error::ApiError;

/// Item id taken from the `:id` path segment.
///
/// Anything that is not a base-10 integer is rejected with a 400
/// `INVALID_FORMAT` error instead of axum's plain-text rejection.
///
/// ```rust,ignore
/// async fn get_item(ItemIdPath(id): ItemIdPath) -> ApiResult<Json<Item>> { ... }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemIdPath(pub ItemId);

#[async_trait]
impl<S> FromRequestParts<S> for ItemIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_input(e.body_text()))?;

        id_from_segment(&raw).map(ItemIdPath)
    }
}

fn id_from_segment(raw: &str) -> Result<ItemId, ApiError> {
    parse_item_id(raw)
        .map_err(|e| ApiError::from(e).with_details(serde_json::json!({ "id": raw })))
}
