//! # Domain Types
//!
//! Core domain types used throughout Cardholdr.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  LoyaltyCard    │   │  BarcodeType    │   │   CardColor     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │   │  CODE128        │   │  Palette(key)   │       │
//! │  │  name           │   │  QR             │   │  Custom(hex)    │       │
//! │  │  cardNumber     │   │  EAN13          │   └─────────────────┘       │
//! │  │  barcodeType    │   │  CODE39         │                              │
//! │  │  openCount      │   │  UPC            │   ┌─────────────────┐       │
//! │  │  created/updated│   └─────────────────┘   │ Create/Update   │       │
//! │  └─────────────────┘                         │ CardInput       │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Cards serialize with camelCase keys (`cardNumber`, `openCount`, ...) and
//! epoch-millisecond timestamps, the exact shape of the blob written by the
//! mobile app, so stored wallets from any release decode unchanged.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// =============================================================================
// Barcode Type
// =============================================================================

/// Barcode symbology a card is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BarcodeType {
    /// Code 128, the default for loyalty programs.
    #[default]
    #[serde(rename = "CODE128")]
    Code128,
    /// QR matrix code.
    #[serde(rename = "QR")]
    Qr,
    /// EAN-13 retail barcode.
    #[serde(rename = "EAN13")]
    Ean13,
    /// Code 39.
    #[serde(rename = "CODE39")]
    Code39,
    /// UPC-A.
    #[serde(rename = "UPC")]
    Upc,
}

impl BarcodeType {
    /// Every supported symbology, in picker order.
    pub const ALL: [BarcodeType; 5] = [
        BarcodeType::Code128,
        BarcodeType::Qr,
        BarcodeType::Ean13,
        BarcodeType::Code39,
        BarcodeType::Upc,
    ];

    /// Returns the stored tag (`"CODE128"`, `"QR"`, ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            BarcodeType::Code128 => "CODE128",
            BarcodeType::Qr => "QR",
            BarcodeType::Ean13 => "EAN13",
            BarcodeType::Code39 => "CODE39",
            BarcodeType::Upc => "UPC",
        }
    }

    /// Returns true for bar (1-D) symbologies.
    pub const fn is_linear(&self) -> bool {
        !matches!(self, BarcodeType::Qr)
    }

    /// Maps a camera scanner's symbology tag onto a card barcode type.
    ///
    /// ## Mapping
    /// ```text
    /// qr            → QR
    /// ean13         → EAN13
    /// code39        → CODE39
    /// upc_a, upc_e  → UPC
    /// code128, *    → CODE128
    /// ```
    ///
    /// Scanners report more symbologies than a card can store (ean8,
    /// codabar, itf14, pdf417); those fall back to Code 128.
    pub fn from_scan_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "qr" => BarcodeType::Qr,
            "ean13" => BarcodeType::Ean13,
            "code39" => BarcodeType::Code39,
            "upc_a" | "upc_e" => BarcodeType::Upc,
            _ => BarcodeType::Code128,
        }
    }
}

impl fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarcodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BarcodeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown barcode type: '{}'. Valid options: CODE128, QR, EAN13, CODE39, UPC",
                    s
                )
            })
    }
}

// =============================================================================
// Card Colour
// =============================================================================

/// Gradient presets a card face can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardGradient {
    Coral,
    Red,
    Blue,
    Purple,
    Green,
    Pink,
    Orange,
    Yellow,
    Teal,
    Cyan,
    Indigo,
    Slate,
}

impl CardGradient {
    /// Every preset, in palette order.
    pub const ALL: [CardGradient; 12] = [
        CardGradient::Coral,
        CardGradient::Red,
        CardGradient::Blue,
        CardGradient::Purple,
        CardGradient::Green,
        CardGradient::Pink,
        CardGradient::Orange,
        CardGradient::Yellow,
        CardGradient::Teal,
        CardGradient::Cyan,
        CardGradient::Indigo,
        CardGradient::Slate,
    ];

    /// Palette key as stored on a card.
    pub const fn key(&self) -> &'static str {
        match self {
            CardGradient::Coral => "coral",
            CardGradient::Red => "red",
            CardGradient::Blue => "blue",
            CardGradient::Purple => "purple",
            CardGradient::Green => "green",
            CardGradient::Pink => "pink",
            CardGradient::Orange => "orange",
            CardGradient::Yellow => "yellow",
            CardGradient::Teal => "teal",
            CardGradient::Cyan => "cyan",
            CardGradient::Indigo => "indigo",
            CardGradient::Slate => "slate",
        }
    }

    /// Start and end stops of the gradient.
    pub const fn stops(&self) -> (&'static str, &'static str) {
        match self {
            CardGradient::Coral => ("#FF6B4A", "#E54D2E"),
            CardGradient::Red => ("#EF4444", "#DC2626"),
            CardGradient::Blue => ("#3B82F6", "#1D4ED8"),
            CardGradient::Purple => ("#8B5CF6", "#6D28D9"),
            CardGradient::Green => ("#10B981", "#047857"),
            CardGradient::Pink => ("#EC4899", "#BE185D"),
            CardGradient::Orange => ("#F97316", "#C2410C"),
            CardGradient::Yellow => ("#EAB308", "#CA8A04"),
            CardGradient::Teal => ("#14B8A6", "#0D9488"),
            CardGradient::Cyan => ("#06B6D4", "#0891B2"),
            CardGradient::Indigo => ("#6366F1", "#4338CA"),
            CardGradient::Slate => ("#64748B", "#475569"),
        }
    }

    /// Looks up a preset by palette key.
    pub fn from_key(key: &str) -> Option<Self> {
        CardGradient::ALL.into_iter().find(|g| g.key() == key)
    }
}

/// Colour of a card face: a palette key or a raw custom string.
///
/// Serialized as a bare string. Unknown strings always decode as
/// [`CardColor::Custom`], so a blob written with a newer palette still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardColor {
    Palette(CardGradient),
    Custom(String),
}

impl CardColor {
    /// Returns the stored string form.
    pub fn as_str(&self) -> &str {
        match self {
            CardColor::Palette(gradient) => gradient.key(),
            CardColor::Custom(raw) => raw,
        }
    }

    /// Start and end stops used to paint the card face.
    ///
    /// Custom hex colours fade to a copy darkened by 20 per channel.
    /// Custom strings that are not hex are returned as a flat gradient.
    ///
    /// ```rust
    /// use cardholdr_core::CardColor;
    ///
    /// let (start, end) = CardColor::from("#3366cc").gradient();
    /// assert_eq!(start, "#3366cc");
    /// assert_eq!(end, "#1f52b8");
    /// ```
    pub fn gradient(&self) -> (String, String) {
        match self {
            CardColor::Palette(gradient) => {
                let (start, end) = gradient.stops();
                (start.to_string(), end.to_string())
            }
            CardColor::Custom(raw) => match parse_hex_rgb(raw) {
                Some(rgb) => (raw.clone(), darken(rgb, CUSTOM_GRADIENT_SHIFT)),
                None => (raw.clone(), raw.clone()),
            },
        }
    }
}

const CUSTOM_GRADIENT_SHIFT: u8 = 20;

/// Parses `#RGB` or `#RRGGBB` into channels.
fn parse_hex_rgb(raw: &str) -> Option<[u8; 3]> {
    let hex = raw.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn darken([r, g, b]: [u8; 3], amount: u8) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        r.saturating_sub(amount),
        g.saturating_sub(amount),
        b.saturating_sub(amount)
    )
}

impl Default for CardColor {
    fn default() -> Self {
        CardColor::Palette(CardGradient::Coral)
    }
}

impl From<String> for CardColor {
    fn from(raw: String) -> Self {
        match CardGradient::from_key(&raw) {
            Some(gradient) => CardColor::Palette(gradient),
            None => CardColor::Custom(raw),
        }
    }
}

impl From<&str> for CardColor {
    fn from(raw: &str) -> Self {
        CardColor::from(raw.to_string())
    }
}

impl From<CardColor> for String {
    fn from(color: CardColor) -> Self {
        match color {
            CardColor::Palette(gradient) => gradient.key().to_string(),
            CardColor::Custom(raw) => raw,
        }
    }
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Loyalty Card
// =============================================================================

/// A saved loyalty card.
///
/// ## Invariants
/// - `id` is unique across the wallet and never changes
/// - `created_at` is set once; `updated_at >= created_at`
/// - `open_count` only grows (unsigned, incremented by one per open)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyCard {
    /// Opaque unique identifier (`{millis}-{random}`).
    pub id: String,

    /// Store / program name shown on the card face.
    pub name: String,

    /// Raw barcode payload.
    pub card_number: String,

    /// Symbology used to render `card_number`.
    pub barcode_type: BarcodeType,

    /// Palette key or custom colour string.
    #[ts(type = "string")]
    pub color: CardColor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation time, epoch milliseconds.
    #[ts(type = "number")]
    pub created_at: i64,

    /// Last mutation time, epoch milliseconds.
    #[ts(type = "number")]
    pub updated_at: i64,

    /// Number of times the detail view was opened.
    /// Absent in blobs written before popularity ranking existed.
    #[serde(default)]
    pub open_count: u32,
}

impl LoyaltyCard {
    /// Builds a brand-new card from validated input.
    pub fn new(id: String, input: CreateCardInput, now_millis: i64) -> Self {
        LoyaltyCard {
            id,
            name: input.name,
            card_number: input.card_number,
            barcode_type: input.barcode_type,
            color: input.color,
            logo_url: input.logo_url,
            notes: input.notes,
            created_at: now_millis,
            updated_at: now_millis,
            open_count: 0,
        }
    }

    /// Bumps `updated_at` for a mutation happening at `now_millis`.
    ///
    /// The new value is strictly greater than the previous one even when two
    /// mutations land in the same millisecond or the wall clock steps back.
    pub fn touch(&mut self, now_millis: i64) {
        self.updated_at = now_millis
            .max(self.updated_at.saturating_add(1))
            .max(self.created_at);
    }

    /// Records one opening of the detail view.
    pub fn record_open(&mut self, now_millis: i64) {
        self.open_count = self.open_count.saturating_add(1);
        self.touch(now_millis);
    }

    /// Creation time as a UTC datetime.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    /// Last mutation time as a UTC datetime.
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.updated_at)
    }

    /// Card number grouped for display (see [`format_card_number`]).
    pub fn formatted_number(&self) -> String {
        format_card_number(&self.card_number)
    }
}

// =============================================================================
// Ordering
// =============================================================================

/// Wallet ordering: most opened first, then most recently updated.
pub fn popularity_order(a: &LoyaltyCard, b: &LoyaltyCard) -> Ordering {
    b.open_count
        .cmp(&a.open_count)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}

/// Sorts cards in wallet order. Stable, so full ties keep their input order.
pub fn sort_by_popularity(cards: &mut [LoyaltyCard]) {
    cards.sort_by(popularity_order);
}

// =============================================================================
// Identifiers
// =============================================================================

/// Generates a card ID: millisecond timestamp prefix plus a random suffix.
///
/// ```rust
/// let id = cardholdr_core::generate_card_id(1_700_000_000_000);
/// assert!(id.starts_with("1700000000000-"));
/// assert_eq!(id.len(), "1700000000000-".len() + 9);
/// ```
pub fn generate_card_id(now_millis: i64) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now_millis, &random[..9])
}

// =============================================================================
// Input Types
// =============================================================================

/// Fields supplied when adding a card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardInput {
    pub name: String,
    pub card_number: String,
    #[serde(default)]
    pub barcode_type: BarcodeType,
    #[serde(default)]
    #[ts(type = "string")]
    pub color: CardColor,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateCardInput {
    /// Shorthand for the four fields the add-card screen always sends.
    pub fn new(
        name: impl Into<String>,
        card_number: impl Into<String>,
        barcode_type: BarcodeType,
        color: impl Into<CardColor>,
    ) -> Self {
        CreateCardInput {
            name: name.into(),
            card_number: card_number.into(),
            barcode_type,
            color: color.into(),
            logo_url: None,
            notes: None,
        }
    }

    /// Sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Trims text fields; blank optional fields become `None`.
    pub fn normalized(self) -> Self {
        CreateCardInput {
            name: self.name.trim().to_string(),
            card_number: self.card_number.trim().to_string(),
            barcode_type: self.barcode_type,
            color: self.color,
            logo_url: normalize_optional(self.logo_url),
            notes: normalize_optional(self.notes),
        }
    }
}

/// Partial update; `None` leaves the stored field unchanged.
///
/// An optional text field set to an empty string clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub barcode_type: Option<BarcodeType>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub color: Option<CardColor>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateCardInput {
    /// Update that only renames the card.
    pub fn name(name: impl Into<String>) -> Self {
        UpdateCardInput {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &UpdateCardInput::default()
    }

    /// Trims the provided text fields.
    pub fn normalized(self) -> Self {
        UpdateCardInput {
            name: self.name.map(|n| n.trim().to_string()),
            card_number: self.card_number.map(|n| n.trim().to_string()),
            barcode_type: self.barcode_type,
            color: self.color,
            logo_url: self.logo_url.map(|u| u.trim().to_string()),
            notes: self.notes.map(|n| n.trim().to_string()),
        }
    }

    /// Merges the provided fields over `card`. Does not touch timestamps.
    pub fn apply_to(self, card: &mut LoyaltyCard) {
        if let Some(name) = self.name {
            card.name = name;
        }
        if let Some(card_number) = self.card_number {
            card.card_number = card_number;
        }
        if let Some(barcode_type) = self.barcode_type {
            card.barcode_type = barcode_type;
        }
        if let Some(color) = self.color {
            card.color = color;
        }
        if let Some(logo_url) = self.logo_url {
            card.logo_url = non_empty(logo_url);
        }
        if let Some(notes) = self.notes {
            card.notes = non_empty(notes);
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| non_empty(v.trim().to_string()))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// =============================================================================
// Display Helpers
// =============================================================================

/// Groups a card number in blocks of four for display.
///
/// ```rust
/// use cardholdr_core::format_card_number;
///
/// assert_eq!(format_card_number("6141290012345678"), "6141 2900 1234 5678");
/// assert_eq!(format_card_number("7890123456"), "7890 1234 56");
/// ```
pub fn format_card_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    chars
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Sample Data
// =============================================================================

const DAY_MILLIS: i64 = 86_400_000;

/// Sample wallet written on first run (and by the `seed` binary).
pub fn sample_cards(now_millis: i64) -> Vec<LoyaltyCard> {
    let samples = [
        ("sample-1", "Starbucks Rewards", "6141290012345678", CardGradient::Green, 7),
        ("sample-2", "Target Circle", "4589123456789012", CardGradient::Coral, 5),
        ("sample-3", "CVS ExtraCare", "7890123456", CardGradient::Purple, 3),
        ("sample-4", "Costco Membership", "111234567890", CardGradient::Blue, 1),
    ];

    samples
        .into_iter()
        .map(|(id, name, number, gradient, days_ago)| {
            let input = CreateCardInput::new(
                name,
                number,
                BarcodeType::Code128,
                CardColor::Palette(gradient),
            );
            LoyaltyCard::new(id.to_string(), input, now_millis - DAY_MILLIS * days_ago)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, open_count: u32, updated_at: i64) -> LoyaltyCard {
        let mut card = LoyaltyCard::new(
            id.to_string(),
            CreateCardInput::new(id, "123", BarcodeType::Code128, "coral"),
            0,
        );
        card.open_count = open_count;
        card.updated_at = updated_at;
        card
    }

    #[test]
    fn test_barcode_type_wire_names() {
        let json = serde_json::to_string(&BarcodeType::ALL).unwrap();
        assert_eq!(json, r#"["CODE128","QR","EAN13","CODE39","UPC"]"#);
    }

    #[test]
    fn test_barcode_type_from_str() {
        assert_eq!("ean13".parse::<BarcodeType>().unwrap(), BarcodeType::Ean13);
        assert_eq!("QR".parse::<BarcodeType>().unwrap(), BarcodeType::Qr);
        assert!("PDF417".parse::<BarcodeType>().is_err());
    }

    #[test]
    fn test_scan_tag_mapping() {
        assert_eq!(BarcodeType::from_scan_tag("qr"), BarcodeType::Qr);
        assert_eq!(BarcodeType::from_scan_tag("ean13"), BarcodeType::Ean13);
        assert_eq!(BarcodeType::from_scan_tag("code39"), BarcodeType::Code39);
        assert_eq!(BarcodeType::from_scan_tag("upc_a"), BarcodeType::Upc);
        assert_eq!(BarcodeType::from_scan_tag("upc_e"), BarcodeType::Upc);
        assert_eq!(BarcodeType::from_scan_tag("code128"), BarcodeType::Code128);
        assert_eq!(BarcodeType::from_scan_tag("pdf417"), BarcodeType::Code128);
    }

    #[test]
    fn test_palette_gradient() {
        let (start, end) = CardColor::from("green").gradient();
        assert_eq!(start, "#10B981");
        assert_eq!(end, "#047857");
    }

    #[test]
    fn test_custom_hex_gradient() {
        let (start, end) = CardColor::from("#FF8040").gradient();
        assert_eq!(start, "#FF8040");
        assert_eq!(end, "#eb6c2c");
    }

    #[test]
    fn test_short_hex_gradient_expands() {
        // #f80 → #ff8800
        let (start, end) = CardColor::from("#f80").gradient();
        assert_eq!(start, "#f80");
        assert_eq!(end, "#eb7400");
    }

    #[test]
    fn test_gradient_clamps_at_black() {
        assert_eq!(CardColor::from("#000000").gradient().1, "#000000");
        assert_eq!(CardColor::from("#0a1433").gradient().1, "#00001f");
    }

    #[test]
    fn test_non_hex_custom_gradient_is_flat() {
        let color = CardColor::Custom("mauve".to_string());
        assert_eq!(color.gradient(), ("mauve".to_string(), "mauve".to_string()));
    }

    #[test]
    fn test_card_color_round_trip() {
        assert_eq!(
            CardColor::from("teal"),
            CardColor::Palette(CardGradient::Teal)
        );
        assert_eq!(
            CardColor::from("#123ABC"),
            CardColor::Custom("#123ABC".to_string())
        );

        let json = serde_json::to_string(&CardColor::Palette(CardGradient::Slate)).unwrap();
        assert_eq!(json, r#""slate""#);
        let custom: CardColor = serde_json::from_str(r##""#ff00ff""##).unwrap();
        assert_eq!(custom.as_str(), "#ff00ff");
    }

    #[test]
    fn test_legacy_card_without_open_count() {
        let json = r#"{
            "id": "1",
            "name": "Starbucks Rewards",
            "cardNumber": "6141290012345678",
            "barcodeType": "CODE128",
            "color": "green",
            "createdAt": 1700000000000,
            "updatedAt": 1700000000000
        }"#;
        let card: LoyaltyCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.open_count, 0);
        assert_eq!(card.notes, None);
        assert_eq!(card.color, CardColor::Palette(CardGradient::Green));
    }

    #[test]
    fn test_card_serializes_camel_case() {
        let card = card("a", 2, 10);
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["cardNumber"], "123");
        assert_eq!(value["barcodeType"], "CODE128");
        assert_eq!(value["openCount"], 2);
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_popularity_order() {
        let mut cards = vec![card("old", 0, 10), card("hot", 3, 1), card("new", 0, 20)];
        sort_by_popularity(&mut cards);
        let ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["hot", "new", "old"]);
    }

    #[test]
    fn test_touch_is_strictly_increasing() {
        let mut card = card("a", 0, 100);
        card.created_at = 100;
        card.touch(100);
        assert_eq!(card.updated_at, 101);
        card.touch(50);
        assert_eq!(card.updated_at, 102);
        card.touch(500);
        assert_eq!(card.updated_at, 500);
        assert_eq!(card.created_at, 100);
    }

    #[test]
    fn test_record_open() {
        let mut card = card("a", 0, 0);
        card.record_open(10);
        card.record_open(20);
        assert_eq!(card.open_count, 2);
        assert_eq!(card.updated_at, 20);
    }

    #[test]
    fn test_generate_card_id_unique() {
        let a = generate_card_id(1);
        let b = generate_card_id(1);
        assert_ne!(a, b);
        assert!(a.starts_with("1-"));
    }

    #[test]
    fn test_update_input_merge() {
        let mut card = card("a", 1, 5);
        card.notes = Some("gold tier".to_string());

        UpdateCardInput {
            name: Some("New Name".to_string()),
            notes: Some(String::new()),
            ..Default::default()
        }
        .apply_to(&mut card);

        assert_eq!(card.name, "New Name");
        assert_eq!(card.card_number, "123");
        assert_eq!(card.notes, None);
        assert_eq!(card.open_count, 1);
    }

    #[test]
    fn test_create_input_normalized() {
        let input = CreateCardInput::new("  Target ", " 4589 ", BarcodeType::Code128, "red")
            .with_notes("   ")
            .normalized();
        assert_eq!(input.name, "Target");
        assert_eq!(input.card_number, "4589");
        assert_eq!(input.notes, None);
    }

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number(""), "");
        assert_eq!(format_card_number("1234"), "1234");
        assert_eq!(format_card_number("111234567890"), "1112 3456 7890");
    }

    #[test]
    fn test_sample_cards() {
        let now = 1_700_000_000_000;
        let cards = sample_cards(now);
        assert_eq!(cards.len(), 4);
        assert!(cards.iter().all(|c| c.updated_at < now && c.open_count == 0));
        assert_eq!(cards[0].name, "Starbucks Rewards");
    }
}
