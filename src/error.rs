//! Error types for the storage and cache layers
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Storage Error Enum ==
/// Unified error type for storage and cache operations.
///
/// Errors of this type never cross the public cache surface: every public
/// operation catches them, logs a diagnostic, and returns a safe default.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing medium cannot be reached or refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backing medium is out of capacity
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// A value could not be serialized or deserialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The runtime lacks the context the operation needs (e.g. no cookie source)
    #[error("Missing runtime context: {0}")]
    MissingContext(String),

    /// The backend reported an operation-specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

// == Result Type Alias ==
/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::Unavailable("disk gone".to_string());
        assert_eq!(err.to_string(), "Storage unavailable: disk gone");

        let err = StorageError::QuotaExceeded("5 MB limit".to_string());
        assert_eq!(err.to_string(), "Storage quota exceeded: 5 MB limit");
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StorageError = json_err.into();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
