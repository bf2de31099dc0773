//! # cardholdr-store: Persistence Layer for Cardholdr
//!
//! This crate owns the wallet's card collection. It keeps the cards as one
//! JSON array in a key-value store (SQLite via sqlx in the app, an
//! in-memory map in tests) behind a cached, mutex-guarded [`CardStore`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cardholdr Data Flow                              │
//! │                                                                         │
//! │  Wallet screen (list, detail, add/edit)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 cardholdr-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  CardStore    │    │ KeyValueStore │    │  Database    │  │   │
//! │  │   │ (repository/  │    │   (kv.rs)     │    │  (pool.rs)   │  │   │
//! │  │   │   card.rs)    │    │               │    │              │  │   │
//! │  │   │ cache + lock  │───►│ SqliteStore   │───►│ SqlitePool   │  │   │
//! │  │   │ ordering      │    │ MemoryStore   │    │ migrations   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/cardholdr/cardholdr.db                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`kv`] - Key-value store trait and in-memory implementation
//! - [`clock`] - Injectable time source
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Store error types
//! - [`repository`] - `CardStore` and the SQLite key-value table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cardholdr_store::{CardStore, CardholdrConfig, Database, DbConfig};
//!
//! let config = CardholdrConfig::load(None)?;
//! let db = Database::new(DbConfig::new(config.database_path()?)).await?;
//!
//! let store = CardStore::from_config(Arc::new(db.kv_store()), &config);
//! store.initialize().await?;
//! let cards = store.get_cards().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod config;
pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CardholdrConfig, DecodePolicy};
pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::card::{CardStore, CardStoreOptions};
pub use repository::kv::SqliteStore;
