//! # Repository Module
//!
//! Persistence-facing implementations for the wallet.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Screen                                                                │
//! │       │                                                                 │
//! │       │  store.get_cards() / store.increment_open_count(id)            │
//! │       ▼                                                                 │
//! │  CardStore (card.rs)                                                   │
//! │  ├── cache + mutex                                                     │
//! │  ├── ordering, IDs, timestamps                                         │
//! │  └── one whole-list write per mutation                                 │
//! │       │                                                                 │
//! │       │  get / set / remove                                            │
//! │       ▼                                                                 │
//! │  dyn KeyValueStore                                                     │
//! │  ├── SqliteStore (kv.rs)                                               │
//! │  └── MemoryStore (crate::kv)                                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CardStore`](card::CardStore) - Cached card CRUD and ranking
//! - [`SqliteStore`](kv::SqliteStore) - Durable key-value table

pub mod card;
pub mod kv;
