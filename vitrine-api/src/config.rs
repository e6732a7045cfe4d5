//! API Configuration Module
//!
//! Configuration for CORS, the dataset location, pagination limits, and the
//! bind address. Loaded from environment variables with defaults suited to
//! local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use vitrine_core::ConfigError;

use crate::constants::{
    DEFAULT_BIND_HOST, DEFAULT_CORS_MAX_AGE_SECS, DEFAULT_DATA_PATH, DEFAULT_PAGE_SIZE,
    DEFAULT_PORT, MAX_PAGE_SIZE,
};

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Dataset Configuration
    // ========================================================================
    /// Path of the JSON dataset file.
    pub data_path: PathBuf,

    /// Whether to watch the dataset file for changes.
    pub watch_enabled: bool,

    // ========================================================================
    // Listing Configuration
    // ========================================================================
    pub default_page_size: u64,

    /// Larger `limit` values are clamped to this.
    pub max_page_size: u64,

    // ========================================================================
    // Server Configuration
    // ========================================================================
    pub bind_host: String,
    pub port: u16,

    /// Deployment environment (development, staging, production).
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: DEFAULT_CORS_MAX_AGE_SECS,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            watch_enabled: true,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `VITRINE_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `VITRINE_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `VITRINE_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `VITRINE_DATA_PATH`: Dataset file (default: data/items.json)
    /// - `VITRINE_WATCH_ENABLED`: "false" disables the file watcher (default: true)
    /// - `VITRINE_DEFAULT_PAGE_SIZE`: Listing page size (default: 10)
    /// - `VITRINE_MAX_PAGE_SIZE`: Listing page size cap (default: 500)
    /// - `VITRINE_API_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` or `VITRINE_API_PORT`: Bind port, `PORT` wins (default: 3001)
    /// - `VITRINE_ENVIRONMENT`: Deployment environment (default: development)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cors_origins = lookup("VITRINE_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = lookup("VITRINE_CORS_ALLOW_CREDENTIALS")
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let cors_max_age_secs = lookup("VITRINE_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let data_path = lookup("VITRINE_DATA_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let watch_enabled = lookup("VITRINE_WATCH_ENABLED")
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);

        let default_page_size = parse_number(&lookup, "VITRINE_DEFAULT_PAGE_SIZE")?
            .unwrap_or(defaults.default_page_size);
        let max_page_size =
            parse_number(&lookup, "VITRINE_MAX_PAGE_SIZE")?.unwrap_or(defaults.max_page_size);

        let bind_host = lookup("VITRINE_API_BIND").unwrap_or(defaults.bind_host);

        let port = match lookup("PORT").or_else(|| lookup("VITRINE_API_PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                field: "port".to_string(),
                value: raw.clone(),
                reason: "must be an integer between 0 and 65535".to_string(),
            })?,
            None => defaults.port,
        };

        let environment = lookup("VITRINE_ENVIRONMENT").unwrap_or(defaults.environment);

        let config = Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            data_path,
            watch_enabled,
            default_page_size,
            max_page_size,
            bind_host,
            port,
            environment,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        matches!(self.environment.to_lowercase().as_str(), "production" | "prod")
    }

    /// Reject configurations that are unsafe or inconsistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_page_size".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_page_size < self.default_page_size {
            return Err(ConfigError::InvalidValue {
                field: "max_page_size".to_string(),
                value: self.max_page_size.to_string(),
                reason: format!("must be at least default_page_size ({})", self.default_page_size),
            });
        }
        if self.is_production() && self.cors_origins.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "VITRINE_CORS_ORIGINS (required in production)".to_string(),
            });
        }
        if self.cors_allow_credentials && self.cors_origins.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cors_allow_credentials".to_string(),
                value: "true".to_string(),
                reason: "credentials require explicit CORS origins".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>().map_err(|e| ConfigError::InvalidValue {
            field: "bind address".to_string(),
            value: addr.clone(),
            reason: e.to_string(),
        })
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            return true;
        }
        self.cors_origins.iter().any(|allowed| allowed == origin)
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                field: key.to_string(),
                value: raw.clone(),
                reason: "must be a non-negative integer".to_string(),
            }),
    }
}
