//! Aggregate statistics over an item collection.

use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label for items with a missing or empty category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Lowest and highest positive price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PriceRange {
    #[serde(serialize_with = "serialize_number")]
    pub min: f64,
    #[serde(serialize_with = "serialize_number")]
    pub max: f64,
}

impl PriceRange {
    pub const ZERO: PriceRange = PriceRange { min: 0.0, max: 0.0 };
}

/// Derived summary of the dataset. Never persisted.
///
/// `categories` and `price_range` are absent only for an empty collection,
/// which serializes to exactly `{"total":0,"averagePrice":0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total: u64,
    #[serde(serialize_with = "serialize_number")]
    pub average_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<String, u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
}

impl StatsSummary {
    pub fn empty() -> Self {
        Self {
            total: 0,
            average_price: 0.0,
            categories: None,
            price_range: None,
        }
    }
}

/// Integral values go out as JSON integers (`0`, not `0.0`).
fn serialize_number<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Round to two decimals, half away from zero on the cents value.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the summary for `items`. Pure; input order does not matter.
pub fn calculate_stats(items: &[Item]) -> StatsSummary {
    if items.is_empty() {
        return StatsSummary::empty();
    }

    let total = items.len();
    let price_sum: f64 = items.iter().map(Item::price_or_zero).sum();

    let mut categories = BTreeMap::new();
    for item in items {
        let label = item.category_label().unwrap_or(UNKNOWN_CATEGORY);
        *categories.entry(label.to_string()).or_insert(0u64) += 1;
    }

    let price_range = items
        .iter()
        .map(Item::price_or_zero)
        .filter(|p| *p > 0.0)
        .fold(None, |range: Option<PriceRange>, p| match range {
            None => Some(PriceRange { min: p, max: p }),
            Some(r) => Some(PriceRange {
                min: r.min.min(p),
                max: r.max.max(p),
            }),
        })
        .unwrap_or(PriceRange::ZERO);

    StatsSummary {
        total: total as u64,
        average_price: round_cents(price_sum / total as f64),
        categories: Some(categories),
        price_range: Some(price_range),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: i64, category: Option<&str>, price: Option<f64>) -> Item {
        Item {
            id,
            name: format!("item {id}"),
            category: category.map(str::to_string),
            price,
            description: None,
        }
    }

    #[test]
    fn test_empty_serializes_to_bare_summary() {
        let json = serde_json::to_string(&calculate_stats(&[])).unwrap();
        assert_eq!(json, r#"{"total":0,"averagePrice":0}"#);
    }

    #[test]
    fn test_missing_and_zero_prices_count_toward_average() {
        let items = vec![
            priced(1, Some("A"), Some(10.0)),
            priced(2, Some("A"), Some(0.0)),
            priced(3, Some("A"), None),
        ];
        let stats = calculate_stats(&items);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.average_price, 3.33);
        assert_eq!(stats.price_range, Some(PriceRange { min: 10.0, max: 10.0 }));
    }

    #[test]
    fn test_unknown_category_bucket() {
        let items = vec![
            priced(1, None, Some(1.0)),
            priced(2, Some(""), Some(2.0)),
            priced(3, Some("Tools"), Some(3.0)),
        ];
        let categories = calculate_stats(&items).categories.unwrap();
        assert_eq!(categories.get(UNKNOWN_CATEGORY), Some(&2));
        assert_eq!(categories.get("Tools"), Some(&1));
        assert_eq!(categories.len(), 2);
    }

    #[test]
    fn test_no_positive_prices_gives_zero_range() {
        let items = vec![priced(1, Some("A"), None), priced(2, Some("B"), Some(0.0))];
        let stats = calculate_stats(&items);
        assert_eq!(stats.price_range, Some(PriceRange::ZERO));
        assert_eq!(stats.average_price, 0.0);
    }

    #[test]
    fn test_negative_prices_affect_average_but_not_range() {
        let items = vec![priced(1, None, Some(-4.0)), priced(2, None, Some(8.0))];
        let stats = calculate_stats(&items);
        assert_eq!(stats.average_price, 2.0);
        assert_eq!(stats.price_range, Some(PriceRange { min: 8.0, max: 8.0 }));
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(-0.125), -0.13);
        assert_eq!(round_cents(10.0 / 3.0), 3.33);
    }

    #[test]
    fn test_summary_wire_shape() {
        let items = vec![priced(1, Some("Electronics"), Some(2499.0))];
        let json = serde_json::to_value(calculate_stats(&items)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total": 1,
                "averagePrice": 2499,
                "categories": {"Electronics": 1},
                "priceRange": {"min": 2499, "max": 2499}
            })
        );
    }

    #[test]
    fn test_summary_deserializes_back() {
        let items = vec![priced(1, Some("A"), Some(1.5)), priced(2, None, Some(2.25))];
        let stats = calculate_stats(&items);
        let json = serde_json::to_string(&stats).unwrap();
        let parsed: StatsSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }
}
