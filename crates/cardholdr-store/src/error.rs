//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error / CoreError                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Screen shows a transient failure; data is left unchanged              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cardholdr_core::{CoreError, ValidationError};
use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - Updating, deleting or opening an unknown card ID
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The backing key-value store failed to read or write.
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// The stored blob is not a valid card collection.
    ///
    /// Only surfaced with `DecodePolicy::Strict`.
    #[error("Stored cards could not be decoded: {0}")]
    Decode(String),

    /// The card collection could not be serialized.
    #[error("Cards could not be encoded: {0}")]
    Encode(String),

    /// Input rejected before anything was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// File system error (config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Returns true for errors the caller may retry unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Persistence(_) | StoreError::ConnectionFailed(_)
        )
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolTimedOut   → StoreError::ConnectionFailed
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// Other                       → StoreError::Persistence
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("Connection pool exhausted".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            _ => StoreError::Persistence(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CardNotFound(id) => StoreError::not_found("Card", id),
            CoreError::Validation(e) => StoreError::Validation(e),
        }
    }
}

/// Serialization failures on the write path.
///
/// Reads never convert through here: an undecodable blob goes through
/// `DecodePolicy` and surfaces as `StoreError::Decode` only when strict.
impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Encode(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("Card", "42");
        assert_eq!(err.to_string(), "Card not found: 42");
    }

    #[test]
    fn test_core_error_conversion() {
        let err: StoreError = CoreError::CardNotFound("7".to_string()).into();
        assert!(matches!(err, StoreError::NotFound { ref id, .. } if id == "7"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Encode(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transient() {
        assert!(StoreError::Persistence("disk full".into()).is_transient());
        assert!(!StoreError::not_found("Card", "1").is_transient());
    }
}
