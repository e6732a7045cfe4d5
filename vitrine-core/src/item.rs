//! Item records as stored in the dataset file.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Item identifier. Assigned from the Unix millisecond clock at creation.
pub type ItemId = i64;

/// Parse an item id from its base-10 string form. Surrounding whitespace is ignored.
pub fn parse_item_id(raw: &str) -> Result<ItemId, ValidationError> {
    raw.trim()
        .parse::<ItemId>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "an integer item id".to_string(),
        })
}

/// A single catalog record.
///
/// Records read from disk may omit any field except `id`; a missing name
/// reads as the empty string and the remaining fields stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Item {
    /// Category label, if present and non-empty.
    pub fn category_label(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Price with a missing value counted as zero.
    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

/// Request body for creating an item. The server assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewItem {
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            description: self.description,
        }
    }
}

/// Pick the id for a new item.
///
/// Uses `now_ms` unless an existing id is already at or beyond it, in which
/// case the id becomes `max + 1` so ids stay unique when the clock collides
/// or steps backwards.
pub fn next_item_id(existing: &[Item], now_ms: i64) -> ItemId {
    match existing.iter().map(|item| item.id).max() {
        Some(max) if max >= now_ms => max.saturating_add(1),
        _ => now_ms,
    }
}
