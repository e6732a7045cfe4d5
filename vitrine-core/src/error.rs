//! Error types for VITRINE operations

use std::path::PathBuf;
use thiserror::Error;

/// Dataset storage errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Dataset not found at {path}")]
    DatasetMissing { path: PathBuf },

    #[error("I/O error on {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to parse dataset: {reason}")]
    Parse { reason: String },

    #[error("Failed to serialize dataset: {reason}")]
    Serialize { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// Build an I/O error, mapping `NotFound` to [`StorageError::DatasetMissing`].
    pub fn from_io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            StorageError::DatasetMissing { path }
        } else {
            StorageError::Io {
                path,
                reason: err.to_string(),
            }
        }
    }
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Value out of range for {field}: {reason}")]
    InvalidRange { field: String, reason: String },

    #[error("Invalid format for {field}: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all VITRINE errors.
#[derive(Debug, Clone, Error)]
pub enum VitrineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for VITRINE operations.
pub type VitrineResult<T> = Result<T, VitrineError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_maps_to_dataset_missing() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let mapped = StorageError::from_io("data/items.json", &err);
        assert_eq!(
            mapped,
            StorageError::DatasetMissing {
                path: PathBuf::from("data/items.json")
            }
        );
    }

    #[test]
    fn test_other_io_errors_keep_reason() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match StorageError::from_io("x.json", &err) {
            StorageError::Io { path, reason } => {
                assert_eq!(path, PathBuf::from("x.json"));
                assert!(reason.contains("denied"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidRange {
            field: "limit".to_string(),
            reason: "must be at least 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("limit"));
        assert!(msg.contains("at least 1"));
    }

    #[test]
    fn test_vitrine_error_from_storage() {
        let err: VitrineError = StorageError::LockPoisoned.into();
        assert!(matches!(err, VitrineError::Storage(StorageError::LockPoisoned)));
        assert_eq!(err.to_string(), "Storage error: Storage lock poisoned");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "port".to_string(),
            value: "abc".to_string(),
            reason: "not a number".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for port: abc - not a number");
    }
}
