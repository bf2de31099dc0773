//! # Validation Module
//!
//! Input validation for cards entering the wallet.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Add / Edit screen                                            │
//! │  └── Inline "required" hints while typing                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: CardStore (Rust)                                             │
//! │  └── THIS MODULE: run before anything is persisted                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: BarcodeRenderer                                              │
//! │  └── Symbology checks; failures render as "invalid barcode"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The card number is deliberately NOT checked against its symbology here:
//! a payload that cannot be drawn is still a valid card the user can fix.
//!
//! ## Usage
//! ```rust
//! use cardholdr_core::validation::{validate_card_name, validate_card_number};
//!
//! validate_card_name("Starbucks").unwrap();
//! assert!(validate_card_number("   ").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{CardColor, CreateCardInput, UpdateCardInput};
use crate::{MAX_CARD_NAME_LEN, MAX_CARD_NUMBER_LEN, MAX_NOTES_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a card name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
pub fn validate_card_name(name: &str) -> ValidationResult<()> {
    required_with_max("name", name, MAX_CARD_NAME_LEN)
}

/// Validates a card number (raw barcode payload).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 512 characters
pub fn validate_card_number(number: &str) -> ValidationResult<()> {
    required_with_max("cardNumber", number, MAX_CARD_NUMBER_LEN)
}

/// Validates optional notes.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<()> {
    match notes {
        Some(notes) if notes.chars().count() > MAX_NOTES_LEN => Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates a card colour.
///
/// Palette keys are always accepted. Custom colours must be `#RGB` or
/// `#RRGGBB`.
///
/// ## Example
/// ```rust
/// use cardholdr_core::validation::validate_color;
/// use cardholdr_core::CardColor;
///
/// assert!(validate_color(&CardColor::from("coral")).is_ok());
/// assert!(validate_color(&CardColor::from("#1A2b3C")).is_ok());
/// assert!(validate_color(&CardColor::from("mauve")).is_err());
/// ```
pub fn validate_color(color: &CardColor) -> ValidationResult<()> {
    let raw = match color {
        CardColor::Palette(_) => return Ok(()),
        CardColor::Custom(raw) => raw,
    };

    let is_hex = raw
        .strip_prefix('#')
        .map(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);

    if !is_hex {
        return Err(ValidationError::InvalidFormat {
            field: "color".to_string(),
            reason: "must be a palette key or a #RGB / #RRGGBB hex colour".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates a (normalized) create input.
pub fn validate_create_input(input: &CreateCardInput) -> ValidationResult<()> {
    validate_card_name(&input.name)?;
    validate_card_number(&input.card_number)?;
    validate_color(&input.color)?;
    validate_notes(input.notes.as_deref())?;
    Ok(())
}

/// Validates the fields present in a (normalized) update input.
pub fn validate_update_input(input: &UpdateCardInput) -> ValidationResult<()> {
    if let Some(name) = &input.name {
        validate_card_name(name)?;
    }
    if let Some(number) = &input.card_number {
        validate_card_number(number)?;
    }
    if let Some(color) = &input.color {
        validate_color(color)?;
    }
    validate_notes(input.notes.as_deref())?;
    Ok(())
}

fn required_with_max(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
