//! Property-Based Tests for Item Listing
//!
//! Pagination SHALL partition the filtered results: walking every page in
//! order yields each match exactly once, and the metadata agrees with it.

use proptest::prelude::*;
use vitrine_core::{filter_items, list_items, Item, ListItemsQuery};
use vitrine_test_utils::generators::arb_items;

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    arb_items(80)
}

proptest! {
    #[test]
    fn prop_pages_partition_results(
        items in items_strategy(),
        limit in 1i64..25,
        q in prop::option::of("[a-z]{0,2}"),
    ) {
        let expected: Vec<i64> = filter_items(&items, q.as_deref()).iter().map(|i| i.id).collect();
        let first = list_items(
            &items,
            &ListItemsQuery { limit: Some(limit), page: Some(1), q: q.clone() },
            10,
            500,
        ).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let total_pages = first.pagination.total_pages;
        prop_assert_eq!(first.pagination.total_items, expected.len() as u64);
        prop_assert_eq!(total_pages, (expected.len() as u64).div_ceil(limit as u64));

        let mut seen = Vec::new();
        for page in 1..=total_pages.max(1) {
            let result = list_items(
                &items,
                &ListItemsQuery { limit: Some(limit), page: Some(page as i64), q: q.clone() },
                10,
                500,
            ).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert!(result.items.len() as i64 <= limit);
            prop_assert_eq!(result.pagination.has_next_page, page < total_pages);
            prop_assert_eq!(result.pagination.has_prev_page, page > 1);
            seen.extend(result.items.iter().map(|i| i.id));
        }
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_matches_contain_term(items in items_strategy(), q in "[a-z]{1,2}") {
        for item in filter_items(&items, Some(&q)) {
            let hit = item.name.to_lowercase().contains(&q)
                || item.category.as_deref().is_some_and(|c| c.to_lowercase().contains(&q))
                || item.price.is_some_and(|p| p.to_string().contains(&q));
            prop_assert!(hit);
        }
    }
}
