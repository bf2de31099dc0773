//! # Configuration
//!
//! Runtime configuration for the wallet's persistence and barcode views.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CARDHOLDR_DB_PATH=/data/cardholdr.db                               │
//! │     CARDHOLDR_DECODE_POLICY=strict                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cardholdr/cardholdr.toml (Linux)                         │
//! │     ~/Library/Application Support/app.cardholdr.cardholdr/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! database_path = "/data/cardholdr.db"
//! cards_key = "cardholdr_cards"
//! decode_policy = "lenient"   # lenient | strict
//!
//! [cards]
//! seed_sample_cards = false
//!
//! [barcode]
//! width = 280.0
//! height = 100.0
//! padding = 16.0
//! show_value = true
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use cardholdr_core::barcode::RenderOptions;
use cardholdr_core::CARDS_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

const CONFIG_FILE_NAME: &str = "cardholdr.toml";
const DATABASE_FILE_NAME: &str = "cardholdr.db";

// =============================================================================
// Decode Policy
// =============================================================================

/// What `CardStore` does with a stored blob that is not a card array.
///
/// ## Behavior
/// ```text
/// LENIENT (Default)
///   • log a warning
///   • copy the raw blob to "<cards_key>.corrupt"
///   • continue with an empty wallet
///
/// STRICT
///   • fail the read with StoreError::Decode
///   • leave the stored blob untouched
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    #[default]
    Lenient,
    Strict,
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodePolicy::Lenient => write!(f, "lenient"),
            DecodePolicy::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for DecodePolicy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(DecodePolicy::Lenient),
            "strict" => Ok(DecodePolicy::Strict),
            other => Err(StoreError::Config(format!(
                "Unknown decode policy: '{}'. Valid options: lenient, strict",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Where and how cards are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Default: platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Key holding the card array.
    #[serde(default = "default_cards_key")]
    pub cards_key: String,

    #[serde(default)]
    pub decode_policy: DecodePolicy,
}

fn default_cards_key() -> String {
    CARDS_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            cards_key: default_cards_key(),
            decode_policy: DecodePolicy::default(),
        }
    }
}

/// Card collection behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardSettings {
    /// Write the sample wallet on first run. Default: false
    #[serde(default)]
    pub seed_sample_cards: bool,
}

// =============================================================================
// Cardholdr Config
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardholdrConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub cards: CardSettings,

    #[serde(default)]
    pub barcode: RenderOptions,
}

impl CardholdrConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.storage.cards_key.trim().is_empty() {
            return Err(StoreError::Config("storage.cards_key must not be empty".into()));
        }

        let barcode = &self.barcode;
        if barcode.width <= 0.0 || barcode.height <= 0.0 {
            return Err(StoreError::Config(
                "barcode width and height must be greater than 0".into(),
            ));
        }
        if barcode.padding < 0.0
            || barcode.padding * 2.0 >= barcode.width
            || barcode.padding * 2.0 >= barcode.height
        {
            return Err(StoreError::Config(format!(
                "barcode padding {} does not fit a {}x{} canvas",
                barcode.padding, barcode.width, barcode.height
            )));
        }

        Ok(())
    }

    /// Applies `CARDHOLDR_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("CARDHOLDR_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("CARDHOLDR_STORAGE_KEY") {
            self.storage.cards_key = key;
        }

        if let Some(policy) = lookup("CARDHOLDR_DECODE_POLICY") {
            match policy.parse() {
                Ok(parsed) => self.storage.decode_policy = parsed,
                Err(_) => warn!(policy = %policy, "Unknown decode policy in environment"),
            }
        }

        if let Some(seed) = lookup("CARDHOLDR_SEED_SAMPLES") {
            match seed.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.cards.seed_sample_cards = true,
                "0" | "false" | "no" => self.cards.seed_sample_cards = false,
                _ => warn!(value = %seed, "Unknown CARDHOLDR_SEED_SAMPLES value"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("app", "cardholdr", "cardholdr")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Resolves the SQLite file: configured path or the platform data dir.
    pub fn database_path(&self) -> StoreResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs()
            .ok_or_else(|| StoreError::Config("Could not determine app data directory".into()))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }
}
