//! # Error Types
//!
//! Domain-specific error types for cardholdr-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cardholdr-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── EncodingError    - Payload rejected by a symbology encoder        │
//! │                                                                         │
//! │  cardholdr-store errors (separate crate)                               │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → Screen               │
//! │        EncodingError   → BarcodeLayout::Invalid (never propagated)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::BarcodeType;

// =============================================================================
// Core Error
// =============================================================================

/// Core card logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No card carries the requested ID.
    ///
    /// ## When This Occurs
    /// - Updating, deleting or opening a card that was already deleted
    /// - A screen holding a stale ID after an external refresh
    #[error("Card not found: {0}")]
    CardNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a card is created or merged so that nothing invalid is
/// ever persisted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., a custom colour that is not hex).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Encoding Error
// =============================================================================

/// A payload the chosen symbology cannot represent.
///
/// The renderer turns this into an "invalid barcode" layout; it is public so
/// alternative [`SymbologyEncoder`](crate::barcode::SymbologyEncoder)
/// implementations can report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Characters outside the symbology's alphabet.
    #[error("{symbology} cannot encode character {character:?}")]
    InvalidCharacter {
        symbology: BarcodeType,
        character: char,
    },

    /// Wrong number of characters for a fixed-length symbology.
    #[error("{symbology} expects {expected}, got {actual} characters")]
    InvalidLength {
        symbology: BarcodeType,
        expected: &'static str,
        actual: usize,
    },

    /// Supplied check digit does not match the computed one.
    #[error("{symbology} check digit mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        symbology: BarcodeType,
        expected: u8,
        actual: u8,
    },

    /// The symbology has no linear encoding (QR).
    #[error("{0} is not a linear symbology")]
    NotLinear(BarcodeType),

    /// The underlying encoder library rejected the payload.
    #[error("{symbology} encoder rejected payload: {reason}")]
    Rejected {
        symbology: BarcodeType,
        reason: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
