//! VITRINE Test Utilities
//!
//! Shared test infrastructure for the VITRINE workspace:
//! - Proptest generators for items
//! - Item fixtures and a builder
//! - On-disk temporary datasets
//! - Assertions for VITRINE result types

// Re-export core types for convenience
pub use vitrine_core::{
    calculate_stats, Item, ItemId, NewItem, StatsSummary, StorageError, ValidationError,
    VitrineError, VitrineResult,
};

use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for item data.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_category() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some(String::new())),
            Just(Some("Electronics".to_string())),
            Just(Some("Furniture".to_string())),
            "[A-Z][a-z]{2,12}".prop_map(Some),
        ]
    }

    /// Prices in whole cents, with missing and zero prices mixed in.
    pub fn arb_price() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![
            1 => Just(None),
            1 => Just(Some(0.0)),
            6 => (1u32..10_000_000).prop_map(|cents| Some(f64::from(cents) / 100.0)),
        ]
    }

    pub fn arb_new_item() -> impl Strategy<Value = NewItem> {
        (
            "[A-Za-z][A-Za-z0-9 ]{0,30}",
            arb_category(),
            arb_price(),
            prop::option::of("[a-z ]{0,60}"),
        )
            .prop_map(|(name, category, price, description)| NewItem {
                name,
                category,
                price,
                description,
            })
    }

    /// Collections with unique, ascending ids.
    pub fn arb_items(max_len: usize) -> impl Strategy<Value = Vec<Item>> {
        prop::collection::vec(arb_new_item(), 0..=max_len).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(idx, new)| new.into_item(idx as ItemId + 1))
                .collect()
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built items for common testing scenarios.

    use super::*;

    /// Builder for [`Item`] with every optional field unset.
    #[derive(Debug, Clone)]
    pub struct ItemBuilder {
        item: Item,
    }

    impl ItemBuilder {
        pub fn new(id: ItemId) -> Self {
            Self {
                item: Item {
                    id,
                    name: format!("Item {id}"),
                    category: None,
                    price: None,
                    description: None,
                },
            }
        }

        pub fn name(mut self, name: impl Into<String>) -> Self {
            self.item.name = name.into();
            self
        }

        pub fn category(mut self, category: impl Into<String>) -> Self {
            self.item.category = Some(category.into());
            self
        }

        pub fn price(mut self, price: f64) -> Self {
            self.item.price = Some(price);
            self
        }

        pub fn description(mut self, description: impl Into<String>) -> Self {
            self.item.description = Some(description.into());
            self
        }

        pub fn build(self) -> Item {
            self.item
        }
    }

    /// The five-item catalog used across the workspace's tests.
    pub fn sample_items() -> Vec<Item> {
        vec![
            ItemBuilder::new(1)
                .name("Laptop Pro")
                .category("Electronics")
                .price(2499.0)
                .build(),
            ItemBuilder::new(2)
                .name("Noise Cancelling Headphones")
                .category("Electronics")
                .price(399.0)
                .build(),
            ItemBuilder::new(3)
                .name("Ultra-Wide Monitor")
                .category("Electronics")
                .price(999.0)
                .build(),
            ItemBuilder::new(4)
                .name("Ergonomic Chair")
                .category("Furniture")
                .price(799.0)
                .description("Adjustable lumbar support")
                .build(),
            ItemBuilder::new(5)
                .name("Standing Desk")
                .category("Furniture")
                .price(1199.0)
                .build(),
        ]
    }

    /// `count` items named `Item 1..=count`, alternating two categories.
    pub fn numbered_items(count: usize) -> Vec<Item> {
        (1..=count as ItemId)
            .map(|id| {
                ItemBuilder::new(id)
                    .category(if id % 2 == 0 { "Even" } else { "Odd" })
                    .price(id as f64)
                    .build()
            })
            .collect()
    }

    pub fn new_item(name: &str, category: &str, price: f64) -> NewItem {
        NewItem {
            name: name.to_string(),
            category: Some(category.to_string()),
            price: Some(price),
            description: None,
        }
    }
}

// ============================================================================
// TEMPORARY DATASETS
// ============================================================================

/// A dataset file inside its own temporary directory.
///
/// The directory is deleted when this value drops.
#[derive(Debug)]
pub struct TempDataset {
    dir: TempDir,
    path: PathBuf,
}

impl TempDataset {
    /// An `items.json` holding `items` as pretty JSON.
    pub fn with_items(items: &[Item]) -> std::io::Result<Self> {
        let dataset = Self::empty_dir()?;
        dataset.write_items(items)?;
        Ok(dataset)
    }

    /// A directory with no dataset file yet.
    pub fn empty_dir() -> std::io::Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join("items.json");
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_items(&self, items: &[Item]) -> std::io::Result<()> {
        let body = serde_json::to_string_pretty(items)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, body)
    }

    pub fn write_raw(&self, body: &str) -> std::io::Result<()> {
        std::fs::write(&self.path, body)
    }

    pub fn read_items(&self) -> std::io::Result<Vec<Item>> {
        let raw = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    pub fn remove(&self) -> std::io::Result<()> {
        std::fs::remove_file(&self.path)
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for VITRINE result types.

    use super::*;

    /// Assert that a result is a `DatasetMissing` storage error.
    pub fn assert_dataset_missing<T: std::fmt::Debug>(result: &Result<T, StorageError>) {
        assert!(
            matches!(result, Err(StorageError::DatasetMissing { .. })),
            "Expected DatasetMissing, got: {:?}",
            result
        );
    }

    /// Assert that a result is a `Parse` storage error.
    pub fn assert_parse_error<T: std::fmt::Debug>(result: &Result<T, StorageError>) {
        assert!(
            matches!(result, Err(StorageError::Parse { .. })),
            "Expected Parse error, got: {:?}",
            result
        );
    }

    /// Assert that `summary` is what the calculator produces for `items`.
    pub fn assert_summary_matches(summary: &StatsSummary, items: &[Item]) {
        assert_eq!(summary, &calculate_stats(items), "Summary does not match items");
    }
}
