//! Reusable widget components.

pub mod detail;
pub mod search;

pub use detail::DetailPanel;
pub use search::SearchBar;
