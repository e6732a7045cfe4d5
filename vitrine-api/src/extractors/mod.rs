//! Custom request extractors.

mod item_id;

pub use item_id::ItemIdPath;
