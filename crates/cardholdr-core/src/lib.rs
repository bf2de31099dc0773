//! # cardholdr-core: Pure Card Logic for Cardholdr
//!
//! This crate is the **heart** of the Cardholdr loyalty-card wallet. It
//! contains the card model and the barcode layout math as pure code with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cardholdr Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile Screens                               │   │
//! │  │    Card List ──► Card Detail ──► Add / Edit ──► Scan            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cardholdr-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  barcode  │  │validation │  │   error   │  │   │
//! │  │   │LoyaltyCard│  │ Renderer  │  │   rules   │  │ CoreError │  │   │
//! │  │   │ ordering  │  │ Encoder   │  │   checks  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cardholdr-store (Persistence)                   │   │
//! │  │          Key-value stores, CardStore, configuration             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LoyaltyCard, BarcodeType, CardColor, inputs)
//! - [`barcode`] - Barcode layout rendering and the symbology encoder seam
//! - [`error`] - Domain error types
//! - [`validation`] - Card input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cardholdr_core::barcode::{BarcodeLayout, BarcodeRenderer, RenderOptions};
//! use cardholdr_core::BarcodeType;
//!
//! let mut renderer = BarcodeRenderer::new(RenderOptions::default());
//!
//! // Letters can never be encoded as EAN-13: the renderer recovers locally.
//! let layout = renderer.render("ABC", BarcodeType::Ean13);
//! assert!(matches!(layout, BarcodeLayout::Invalid { .. }));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, EncodingError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key holding the JSON array of every card.
///
/// Kept identical to the key written by earlier releases of the app so
/// existing wallets load without migration.
pub const CARDS_STORAGE_KEY: &str = "cardholdr_cards";

/// Storage key marking that first-run seeding has happened.
pub const INITIALIZED_STORAGE_KEY: &str = "cardholdr_initialized";

/// Maximum length of a card name.
pub const MAX_CARD_NAME_LEN: usize = 100;

/// Maximum length of a card number (barcode payload).
///
/// QR payloads may be long, but a loyalty identifier never approaches this.
pub const MAX_CARD_NUMBER_LEN: usize = 512;

/// Maximum length of free-form notes.
pub const MAX_NOTES_LEN: usize = 1000;
