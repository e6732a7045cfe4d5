//! VITRINE Core - Catalog Types and Pure Logic
//!
//! Item records, the aggregate statistics summary, search and pagination over
//! item collections, and the error types shared by every other crate.
//! Nothing in here touches the filesystem or the network.

pub mod error;
pub mod item;
pub mod listing;
pub mod stats;

use chrono::{DateTime, Utc};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

pub use error::{ConfigError, StorageError, ValidationError, VitrineError, VitrineResult};
pub use item::{next_item_id, parse_item_id, Item, ItemId, NewItem};
pub use listing::{
    filter_items, find_item, list_items, paginate, ItemPage, ListItemsQuery, Pagination,
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use stats::{calculate_stats, round_cents, PriceRange, StatsSummary, UNKNOWN_CATEGORY};
