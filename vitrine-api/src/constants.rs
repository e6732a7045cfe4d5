//! Constants for VITRINE API
//!
//! Centralizing constants makes them easy to find, modify, and test.

// ============================================================================
// DATASET
// ============================================================================

/// Default location of the dataset file, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "data/items.json";

// ============================================================================
// CORS
// ============================================================================

/// Default CORS max age in seconds (24 hours)
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;

// ============================================================================
// PAGINATION
// ============================================================================

/// Default page size for item listings
pub const DEFAULT_PAGE_SIZE: u64 = vitrine_core::DEFAULT_PAGE_SIZE;

/// Maximum page size for item listings
pub const MAX_PAGE_SIZE: u64 = vitrine_core::MAX_PAGE_SIZE;

// ============================================================================
// SERVER
// ============================================================================

/// Default bind host
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default port
pub const DEFAULT_PORT: u16 = 3001;

/// Response header reporting whether stats came from the cache
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Development server URL
pub const DEV_SERVER_URL: &str = "http://localhost:3001";
