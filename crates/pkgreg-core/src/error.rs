//! Error types for the package registry.
//!
//! Conflicts and missing records are not errors at this layer: `create`
//! reports a duplicate name as `Ok(None)` and lookups report absence as `None`.
//! Everything that reaches a caller as `Err` is a real fault.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    // Database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for RegistryError {
    fn from(err: rusqlite::Error) -> Self {
        RegistryError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl RegistryError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        RegistryError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    fn sqlite_failure(&self) -> Option<&rusqlite::ffi::Error> {
        match self {
            RegistryError::Database {
                source: Some(rusqlite::Error::SqliteFailure(err, _)),
                ..
            } => Some(err),
            _ => None,
        }
    }

    fn sqlite_code(&self) -> Option<rusqlite::ErrorCode> {
        self.sqlite_failure().map(|err| err.code)
    }

    /// True when the underlying statement hit a UNIQUE or PRIMARY KEY
    /// constraint, which for the package table means a duplicate `name`.
    pub fn is_unique_violation(&self) -> bool {
        self.sqlite_failure().is_some_and(|err| {
            matches!(
                err.extended_code,
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            )
        })
    }

    /// Check if this error should trigger a retry.
    ///
    /// Only lock contention qualifies; batch operations are safe to rerun
    /// from the start after any of these.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.sqlite_code(),
            Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_failure(code: i32) -> RegistryError {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None).into()
    }

    #[test]
    fn test_error_display() {
        let err = RegistryError::validation("name", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Validation error for name: must not be empty"
        );
    }

    #[test]
    fn test_unique_violation_detected() {
        let err = sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE);
        assert!(err.is_unique_violation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_other_constraints_are_not_conflicts() {
        let err = sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL);
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_BUSY).is_retryable());
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_LOCKED).is_retryable());
        assert!(!RegistryError::Other("boom".into()).is_retryable());
    }

    #[test]
    fn test_non_database_errors_are_not_conflicts() {
        let err: RegistryError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, RegistryError::Json { .. }));
        assert!(!err.is_unique_violation());
    }
}
