//! Search and pagination over item collections.

use crate::error::ValidationError;
use crate::item::{Item, ItemId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_PAGE: u64 = 1;
pub const MAX_PAGE_SIZE: u64 = 500;

/// Query parameters accepted by the item listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListItemsQuery {
    /// Items per page (default 10).
    pub limit: Option<i64>,
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Case-insensitive search over name, category, and price.
    pub q: Option<String>,
}

impl ListItemsQuery {
    /// Resolve `(limit, page)`, applying defaults and clamping `limit` to `max_page_size`.
    pub fn resolve(
        &self,
        default_page_size: u64,
        max_page_size: u64,
    ) -> Result<(u64, u64), ValidationError> {
        let limit = positive("limit", self.limit, default_page_size)?.min(max_page_size.max(1));
        let page = positive("page", self.page, DEFAULT_PAGE)?;
        Ok((limit, page))
    }

    /// The search term, if one was given.
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}

fn positive(field: &str, value: Option<i64>, default: u64) -> Result<u64, ValidationError> {
    match value {
        None => Ok(default),
        Some(v) if v >= 1 => Ok(v as u64),
        Some(v) => Err(ValidationError::InvalidRange {
            field: field.to_string(),
            reason: format!("must be at least 1, got {v}"),
        }),
    }
}

fn nonzero(field: &str, value: u64) -> Result<u64, ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidRange {
            field: field.to_string(),
            reason: "must be at least 1, got 0".to_string(),
        });
    }
    Ok(value)
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub pagination: Pagination,
}

fn matches(item: &Item, term: &str) -> bool {
    item.name.to_lowercase().contains(term)
        || item
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(term))
        || item.price.is_some_and(|p| p.to_string().contains(term))
}

/// Items matching `q` (lowercased substring). An empty or absent term keeps everything.
pub fn filter_items<'a>(items: &'a [Item], q: Option<&str>) -> Vec<&'a Item> {
    match q.filter(|q| !q.is_empty()) {
        None => items.iter().collect(),
        Some(q) => {
            let term = q.to_lowercase();
            items.iter().filter(|item| matches(item, &term)).collect()
        }
    }
}

/// Slice `results` into the requested page. Pages past the end are empty.
///
/// `limit` and `page` are 1-based; zero for either is an `InvalidRange` error.
pub fn paginate(results: &[&Item], limit: u64, page: u64) -> Result<ItemPage, ValidationError> {
    let limit = nonzero("limit", limit)?;
    let page = nonzero("page", page)?;
    let total_items = results.len() as u64;
    let total_pages = total_items.div_ceil(limit);
    let start = (page - 1).saturating_mul(limit);
    let items = results
        .iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .map(|item| (*item).clone())
        .collect();

    Ok(ItemPage {
        items,
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        },
    })
}

/// Filter and paginate in one step.
pub fn list_items(
    items: &[Item],
    query: &ListItemsQuery,
    default_page_size: u64,
    max_page_size: u64,
) -> Result<ItemPage, ValidationError> {
    let (limit, page) = query.resolve(default_page_size, max_page_size)?;
    let results = filter_items(items, query.search_term());
    paginate(&results, limit, page)
}

pub fn find_item(items: &[Item], id: ItemId) -> Option<&Item> {
    items.iter().find(|item| item.id == id)
}
