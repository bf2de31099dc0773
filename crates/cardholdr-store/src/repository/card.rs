//! # Card Repository
//!
//! [`CardStore`] owns the wallet: the canonical list of loyalty cards,
//! persisted as one JSON array under a single key, with an in-process cache
//! mirroring it.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_cards()                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cache populated? ──yes──► return cached list (already in order)       │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  store.get("cardholdr_cards")                                          │
//! │       │                                                                 │
//! │       ├── None ──────────► []                                          │
//! │       ├── valid JSON ────► cards (missing openCount → 0)               │
//! │       └── corrupt ───────► DecodePolicy                                │
//! │                              lenient: quarantine to "<key>.corrupt", []│
//! │                              strict:  StoreError::Decode               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort: openCount desc, updatedAt desc ──► cache ──► return             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add / update / delete / increment                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock ──► copy cached list ──► apply change ──► re-sort                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.set(key, whole list)   ← exactly one write per mutation         │
//! │       │                                                                 │
//! │       ├── Ok  ──► replace cache ──► unlock                             │
//! │       └── Err ──► cache untouched ──► unlock ──► error to caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation holds the store's mutex for its whole read-modify-write
//! cycle, so two callers can never interleave whole-collection writes.

use std::sync::Arc;

use cardholdr_core::validation::{validate_create_input, validate_update_input};
use cardholdr_core::{
    generate_card_id, sample_cards, sort_by_popularity, CreateCardInput, LoyaltyCard,
    UpdateCardInput, CARDS_STORAGE_KEY, INITIALIZED_STORAGE_KEY,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{CardholdrConfig, DecodePolicy};
use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

const CARD_ENTITY: &str = "Card";
const QUARANTINE_SUFFIX: &str = ".corrupt";

// =============================================================================
// Options
// =============================================================================

/// Behaviour knobs for [`CardStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardStoreOptions {
    /// Key holding the card array.
    pub cards_key: String,

    /// Handling of an undecodable card array.
    pub decode_policy: DecodePolicy,

    /// Write the sample wallet during [`CardStore::initialize`].
    pub seed_sample_cards: bool,
}

impl Default for CardStoreOptions {
    fn default() -> Self {
        CardStoreOptions {
            cards_key: CARDS_STORAGE_KEY.to_string(),
            decode_policy: DecodePolicy::default(),
            seed_sample_cards: false,
        }
    }
}

impl From<&CardholdrConfig> for CardStoreOptions {
    fn from(config: &CardholdrConfig) -> Self {
        CardStoreOptions {
            cards_key: config.storage.cards_key.clone(),
            decode_policy: config.storage.decode_policy,
            seed_sample_cards: config.cards.seed_sample_cards,
        }
    }
}

// =============================================================================
// Card Store
// =============================================================================

/// Cached CRUD layer over the wallet's key-value persistence.
///
/// ## Usage
/// ```rust,ignore
/// let store = CardStore::new(Arc::new(db.kv_store()));
/// store.initialize().await?;
///
/// let card = store.add_card(CreateCardInput::new("Starbucks", "6141290012345678",
///     BarcodeType::Code128, "green")).await?;
/// store.increment_open_count(&card.id).await?;
///
/// for card in store.get_cards().await? {
///     println!("{} ({} opens)", card.name, card.open_count);
/// }
/// ```
pub struct CardStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    options: CardStoreOptions,
    /// `None` until the first successful read, and again after invalidation.
    cache: Mutex<Option<Vec<LoyaltyCard>>>,
}

impl CardStore {
    /// Creates a store with default options and the system clock.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_options(store, CardStoreOptions::default())
    }

    /// Creates a store with explicit options.
    pub fn with_options(store: Arc<dyn KeyValueStore>, options: CardStoreOptions) -> Self {
        CardStore {
            store,
            clock: Arc::new(SystemClock),
            options,
            cache: Mutex::new(None),
        }
    }

    /// Creates a store configured from [`CardholdrConfig`].
    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &CardholdrConfig) -> Self {
        Self::with_options(store, CardStoreOptions::from(config))
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the active options.
    pub fn options(&self) -> &CardStoreOptions {
        &self.options
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Runs first-launch setup once per install.
    ///
    /// ## Behavior
    /// - Marker present: nothing happens
    /// - Marker absent, seeding on: the sample wallet replaces the stored
    ///   collection, then the marker is set
    /// - Marker absent, seeding off: only the marker is set
    ///
    /// Returns true when sample cards were written.
    pub async fn initialize(&self) -> StoreResult<bool> {
        let mut cache = self.cache.lock().await;

        if self.store.get(INITIALIZED_STORAGE_KEY).await?.is_some() {
            debug!("Wallet already initialized");
            return Ok(false);
        }

        let seeded = if self.options.seed_sample_cards {
            let mut samples = sample_cards(self.clock.now_millis());
            sort_by_popularity(&mut samples);
            self.persist(&samples).await?;
            *cache = Some(samples);
            true
        } else {
            false
        };

        self.store.set(INITIALIZED_STORAGE_KEY, "true").await?;
        info!(seeded, "Wallet initialized");

        Ok(seeded)
    }

    /// Drops the cache so the next read goes to persistence.
    ///
    /// Call after anything outside this store may have written the key.
    pub async fn invalidate_cache(&self) {
        *self.cache.lock().await = None;
        debug!("Card cache invalidated");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns every card in wallet order.
    ///
    /// ## Ordering
    /// 1. `open_count` descending
    /// 2. `updated_at` descending
    ///
    /// A cache hit returns the cached list as-is.
    pub async fn get_cards(&self) -> StoreResult<Vec<LoyaltyCard>> {
        let mut cache = self.cache.lock().await;
        self.load(&mut cache).await
    }

    /// Returns the card with `id`, or `None`.
    pub async fn get_card(&self, id: &str) -> StoreResult<Option<LoyaltyCard>> {
        let cards = self.get_cards().await?;
        Ok(cards.into_iter().find(|card| card.id == id))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a new card.
    ///
    /// Input is trimmed and validated before anything is read or written.
    /// The new card gets a fresh ID, `created_at == updated_at == now` and
    /// `open_count == 0`.
    pub async fn add_card(&self, input: CreateCardInput) -> StoreResult<LoyaltyCard> {
        let input = input.normalized();
        validate_create_input(&input)?;

        let mut cache = self.cache.lock().await;
        let mut cards = self.load(&mut cache).await?;

        let now = self.clock.now_millis();
        let mut id = generate_card_id(now);
        while cards.iter().any(|card| card.id == id) {
            warn!(id = %id, "Card ID collision, regenerating");
            id = generate_card_id(now);
        }

        let card = LoyaltyCard::new(id, input, now);
        cards.insert(0, card.clone());
        sort_by_popularity(&mut cards);

        self.commit(&mut cache, cards).await?;
        info!(id = %card.id, name = %card.name, "Card added");

        Ok(card)
    }

    /// Merges the provided fields into the card with `id`.
    ///
    /// `created_at` and `open_count` are never touched; `updated_at` always
    /// moves forward.
    pub async fn update_card(&self, id: &str, update: UpdateCardInput) -> StoreResult<LoyaltyCard> {
        let update = update.normalized();
        validate_update_input(&update)?;

        self.mutate(id, |card, now| {
            update.apply_to(card);
            card.touch(now);
        })
        .await
        .inspect(|card| info!(id = %card.id, "Card updated"))
    }

    /// Records one opening of the card's detail view.
    pub async fn increment_open_count(&self, id: &str) -> StoreResult<LoyaltyCard> {
        self.mutate(id, |card, now| card.record_open(now))
            .await
            .inspect(|card| debug!(id = %card.id, open_count = card.open_count, "Card opened"))
    }

    /// Removes the card with `id`.
    pub async fn delete_card(&self, id: &str) -> StoreResult<()> {
        let mut cache = self.cache.lock().await;
        let mut cards = self.load(&mut cache).await?;

        let before = cards.len();
        cards.retain(|card| card.id != id);
        if cards.len() == before {
            return Err(StoreError::not_found(CARD_ENTITY, id));
        }

        self.commit(&mut cache, cards).await?;
        info!(id = %id, "Card deleted");

        Ok(())
    }

    /// Empties the wallet and clears the first-run marker.
    pub async fn clear_all_cards(&self) -> StoreResult<()> {
        let mut cache = self.cache.lock().await;

        self.commit(&mut cache, Vec::new()).await?;
        self.store.remove(INITIALIZED_STORAGE_KEY).await?;
        info!("All cards cleared");

        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Applies `change` to one card, re-sorts and commits.
    async fn mutate<F>(&self, id: &str, change: F) -> StoreResult<LoyaltyCard>
    where
        F: FnOnce(&mut LoyaltyCard, i64),
    {
        let mut cache = self.cache.lock().await;
        let mut cards = self.load(&mut cache).await?;

        let card = cards
            .iter_mut()
            .find(|card| card.id == id)
            .ok_or_else(|| StoreError::not_found(CARD_ENTITY, id))?;
        change(card, self.clock.now_millis());
        let updated = card.clone();

        sort_by_popularity(&mut cards);
        self.commit(&mut cache, cards).await?;

        Ok(updated)
    }

    /// Returns a copy of the cached list, reading it first if needed.
    async fn load(&self, cache: &mut Option<Vec<LoyaltyCard>>) -> StoreResult<Vec<LoyaltyCard>> {
        if let Some(cards) = cache.as_ref() {
            return Ok(cards.clone());
        }

        let mut cards = self.read_stored().await?;
        sort_by_popularity(&mut cards);
        debug!(count = cards.len(), "Cards loaded from storage");

        *cache = Some(cards.clone());
        Ok(cards)
    }

    async fn read_stored(&self) -> StoreResult<Vec<LoyaltyCard>> {
        let key = &self.options.cards_key;
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<LoyaltyCard>>(&raw) {
            Ok(cards) => Ok(cards),
            Err(err) => match self.options.decode_policy {
                DecodePolicy::Strict => Err(StoreError::Decode(err.to_string())),
                DecodePolicy::Lenient => {
                    let quarantine = format!("{}{}", key, QUARANTINE_SUFFIX);
                    warn!(
                        key = %key,
                        quarantine = %quarantine,
                        error = %err,
                        "Stored cards are corrupt, starting with an empty wallet"
                    );
                    self.store.set(&quarantine, &raw).await?;
                    Ok(Vec::new())
                }
            },
        }
    }

    async fn persist(&self, cards: &[LoyaltyCard]) -> StoreResult<()> {
        let json = serde_json::to_string(cards)?;
        self.store.set(&self.options.cards_key, &json).await
    }

    /// Writes `cards` and, only on success, makes them the cached list.
    async fn commit(
        &self,
        cache: &mut Option<Vec<LoyaltyCard>>,
        cards: Vec<LoyaltyCard>,
    ) -> StoreResult<()> {
        if let Err(err) = self.persist(&cards).await {
            warn!(error = %err, "Failed to persist cards");
            return Err(err);
        }
        *cache = Some(cards);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
