//! Property-Based Tests for the Stats Calculator
//!
//! For any item collection, the summary SHALL count every record, group
//! missing categories under one bucket, bound the price range by the
//! positive prices, and be independent of input order.

use proptest::prelude::*;
use vitrine_core::{calculate_stats, round_cents, Item, PriceRange, UNKNOWN_CATEGORY};
use vitrine_test_utils::generators::arb_items;

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    arb_items(60)
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_total_equals_len(items in items_strategy()) {
        prop_assert_eq!(calculate_stats(&items).total, items.len() as u64);
    }

    #[test]
    fn prop_category_counts_sum_to_total(items in items_strategy()) {
        let stats = calculate_stats(&items);
        match stats.categories {
            None => prop_assert!(items.is_empty()),
            Some(categories) => {
                let sum: u64 = categories.values().sum();
                prop_assert_eq!(sum, items.len() as u64);
            }
        }
    }

    #[test]
    fn prop_unknown_bucket_counts_missing_categories(items in items_strategy()) {
        prop_assume!(!items.is_empty());
        let missing = items
            .iter()
            .filter(|i| i.category.as_deref().map_or(true, str::is_empty))
            .count() as u64;
        let categories = calculate_stats(&items).categories.unwrap_or_default();
        prop_assert_eq!(categories.get(UNKNOWN_CATEGORY).copied().unwrap_or(0), missing);
    }

    #[test]
    fn prop_price_range_bounds_positive_prices(items in items_strategy()) {
        prop_assume!(!items.is_empty());
        let range = calculate_stats(&items).price_range.unwrap_or(PriceRange::ZERO);
        let positive: Vec<f64> = items.iter().filter_map(|i| i.price).filter(|p| *p > 0.0).collect();
        if positive.is_empty() {
            prop_assert_eq!(range, PriceRange::ZERO);
        } else {
            prop_assert!(range.min <= range.max);
            for p in positive {
                prop_assert!(range.min <= p && p <= range.max);
            }
        }
    }

    #[test]
    fn prop_average_is_rounded(items in items_strategy()) {
        let avg = calculate_stats(&items).average_price;
        prop_assert_eq!(round_cents(avg), avg);
    }

    #[test]
    fn prop_order_independent(items in items_strategy()) {
        let mut reversed = items.clone();
        reversed.reverse();
        let a = calculate_stats(&items);
        let b = calculate_stats(&reversed);
        prop_assert_eq!(a.total, b.total);
        prop_assert_eq!(a.categories, b.categories);
        prop_assert_eq!(a.price_range, b.price_range);
        prop_assert!((a.average_price - b.average_price).abs() <= 0.010_001);
    }
}
