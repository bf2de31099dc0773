//! # Barcode Rendering
//!
//! Turns a card's payload and symbology into a drawable layout.
//!
//! ## Render Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      BarcodeRenderer::render                            │
//! │                                                                         │
//! │  (value, type)                                                          │
//! │       │                                                                 │
//! │       ├── QR ──────► BarcodeLayout::Qr { size = min(w, h) }            │
//! │       │              (module matrix via `qr_matrix`, qrcode crate)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  memo hit? ──yes──► reuse EncodedBars                                   │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  SymbologyEncoder::encode → "1011000101..." modules (barcoders)         │
//! │       │                                                                 │
//! │       ├── Err ─────► BarcodeLayout::Invalid (never propagated)          │
//! │       ▼                                                                 │
//! │  bars_from_modules: one pass, (x, width) per run of 1s                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  scale = available_width / total_width → BarcodeLayout::Linear          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bit patterns of each symbology are the encoder library's business;
//! this module only validates what it can cheaply check (alphabet, length,
//! check digits) so failures carry a precise reason.

use std::collections::HashMap;

use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::ean13::EAN13;
use qrcode::types::Color;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EncodingError;
use crate::types::BarcodeType;

/// Vertical space reserved for the value caption under linear barcodes.
pub const CAPTION_HEIGHT: f32 = 30.0;

// =============================================================================
// Render Options
// =============================================================================

/// Target dimensions of a rendered barcode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Canvas width in pixels. Default: 280
    pub width: f32,

    /// Canvas height in pixels. Default: 100
    pub height: f32,

    /// Inset applied on every side of the canvas. Default: 0
    pub padding: f32,

    /// Whether the payload is printed under the code. Default: true
    pub show_value: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 280.0,
            height: 100.0,
            padding: 0.0,
            show_value: true,
        }
    }
}

impl RenderOptions {
    /// Options for a `width` × `height` canvas, other fields default.
    pub fn sized(width: f32, height: f32) -> Self {
        RenderOptions {
            width,
            height,
            ..Default::default()
        }
    }

    /// Width left for bars once padding is removed.
    pub fn available_width(&self) -> f32 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    /// Height of each bar of a linear code.
    pub fn bar_height(&self) -> f32 {
        let reserved = if self.show_value {
            CAPTION_HEIGHT
        } else {
            self.padding
        };
        (self.height - reserved).max(0.0)
    }

    /// Side of the square a QR code is drawn in.
    pub fn qr_size(&self) -> f32 {
        (self.width.min(self.height) - 2.0 * self.padding).max(0.0)
    }
}

// =============================================================================
// Layout Types
// =============================================================================

/// One dark bar, already scaled to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    pub x: f32,
    pub width: f32,
}

/// Unscaled run data of an encoded linear barcode, in modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBars {
    /// `(x, width)` of every run of dark modules, left to right.
    pub runs: Vec<(u32, u32)>,

    /// Total number of modules, dark and light.
    pub total_width: u32,
}

/// What a view should draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BarcodeLayout {
    /// A linear barcode scaled to the available width.
    Linear {
        bars: Vec<Bar>,
        bar_height: f32,
        canvas_width: f32,
        caption: Option<String>,
    },

    /// A QR code to be drawn in a `size` × `size` square.
    Qr {
        value: String,
        size: f32,
        caption: Option<String>,
    },

    /// The payload cannot be drawn with the chosen symbology.
    Invalid { reason: String },
}

impl BarcodeLayout {
    /// Returns true for the "invalid barcode" state.
    pub fn is_invalid(&self) -> bool {
        matches!(self, BarcodeLayout::Invalid { .. })
    }
}

// =============================================================================
// Symbology Encoder Seam
// =============================================================================

/// Produces the module pattern (one `0`/`1` byte per module) of a linear
/// barcode.
pub trait SymbologyEncoder: Send + Sync {
    fn encode(&self, value: &str, symbology: BarcodeType) -> Result<Vec<u8>, EncodingError>;
}

/// Encoder backed by the `barcoders` crate.
///
/// ## Payload Preparation
/// - CODE128: even-length digit strings (≥ 4) use code set C, others set B
/// - CODE39: upper-cased first
/// - EAN13: 12 digits, or 13 with a verified check digit
/// - UPC: 11 digits, or 12 with a verified check digit (UPC-A = EAN-13 with
///   a leading zero)
#[derive(Debug, Clone, Copy, Default)]
pub struct BarcodersEncoder;

const CODE128_SET_B: char = 'Ɓ';
const CODE128_SET_C: char = 'Ć';
const CODE39_EXTRA: &str = "-. $/+%";

impl SymbologyEncoder for BarcodersEncoder {
    fn encode(&self, value: &str, symbology: BarcodeType) -> Result<Vec<u8>, EncodingError> {
        if value.is_empty() && symbology.is_linear() {
            return Err(EncodingError::InvalidLength {
                symbology,
                expected: "at least 1",
                actual: 0,
            });
        }

        let rejected = |e: barcoders::error::Error| EncodingError::Rejected {
            symbology,
            reason: format!("{:?}", e),
        };

        match symbology {
            BarcodeType::Qr => Err(EncodingError::NotLinear(symbology)),
            BarcodeType::Code128 => {
                let data = code128_payload(value)?;
                Ok(Code128::new(data).map_err(rejected)?.encode())
            }
            BarcodeType::Code39 => {
                let data = value.to_ascii_uppercase();
                if let Some(bad) = data
                    .chars()
                    .find(|c| !(c.is_ascii_alphanumeric() || CODE39_EXTRA.contains(*c)))
                {
                    return Err(EncodingError::InvalidCharacter {
                        symbology,
                        character: bad,
                    });
                }
                Ok(Code39::new(data).map_err(rejected)?.encode())
            }
            BarcodeType::Ean13 => {
                let body = ean_body(value, symbology, 12)?;
                Ok(EAN13::new(body).map_err(rejected)?.encode())
            }
            BarcodeType::Upc => {
                let body = ean_body(value, symbology, 11)?;
                Ok(EAN13::new(format!("0{}", body)).map_err(rejected)?.encode())
            }
        }
    }
}

fn code128_payload(value: &str) -> Result<String, EncodingError> {
    if let Some(bad) = value.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(EncodingError::InvalidCharacter {
            symbology: BarcodeType::Code128,
            character: bad,
        });
    }

    let all_digits = value.chars().all(|c| c.is_ascii_digit());
    let set = if all_digits && value.len() >= 4 && value.len() % 2 == 0 {
        CODE128_SET_C
    } else {
        CODE128_SET_B
    };
    Ok(format!("{}{}", set, value))
}

/// Returns the digits without check digit for EAN-13 (`body_len` 12) or
/// UPC-A (`body_len` 11), verifying the check digit when one is supplied.
fn ean_body(value: &str, symbology: BarcodeType, body_len: usize) -> Result<String, EncodingError> {
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_digit()) {
        return Err(EncodingError::InvalidCharacter {
            symbology,
            character: bad,
        });
    }

    let expected = if body_len == 12 {
        "12 or 13 digits"
    } else {
        "11 or 12 digits"
    };

    if value.len() == body_len {
        return Ok(value.to_string());
    }
    if value.len() != body_len + 1 {
        return Err(EncodingError::InvalidLength {
            symbology,
            expected,
            actual: value.len(),
        });
    }

    let (body, check) = value.split_at(body_len);
    let actual = check.as_bytes()[0] - b'0';
    let padded = format!("{:0>12}", body);
    let computed = ean_check_digit(&padded);
    if computed != actual {
        return Err(EncodingError::ChecksumMismatch {
            symbology,
            expected: computed,
            actual,
        });
    }

    Ok(body.to_string())
}

/// Modulo-10 check digit over 12 digits (weights 1, 3, 1, 3, ...).
pub fn ean_check_digit(digits: &str) -> u8 {
    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 {
                d
            } else {
                d * 3
            }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

// =============================================================================
// Run Extraction
// =============================================================================

/// Collapses a module pattern into runs of dark modules.
///
/// ```rust
/// use cardholdr_core::barcode::bars_from_modules;
///
/// let encoded = bars_from_modules(&[1, 0, 1, 1, 0, 0, 1]);
/// assert_eq!(encoded.runs, vec![(0, 1), (2, 2), (6, 1)]);
/// assert_eq!(encoded.total_width, 7);
/// ```
pub fn bars_from_modules(modules: &[u8]) -> EncodedBars {
    let mut runs = Vec::new();
    let mut cursor: u32 = 0;
    let mut run_start: Option<u32> = None;

    for &module in modules {
        match (module == 1, run_start) {
            (true, None) => run_start = Some(cursor),
            (false, Some(start)) => {
                runs.push((start, cursor - start));
                run_start = None;
            }
            _ => {}
        }
        cursor += 1;
    }
    if let Some(start) = run_start {
        runs.push((start, cursor - start));
    }

    EncodedBars {
        runs,
        total_width: cursor,
    }
}

// =============================================================================
// QR Matrix
// =============================================================================

/// Square module matrix of a QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    /// Modules per side.
    pub width: usize,

    /// Row-major, `true` = dark.
    pub modules: Vec<bool>,
}

impl QrMatrix {
    /// Returns whether the module at column `x`, row `y` is dark.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }
}

/// Builds the QR module matrix for `value` (an empty value encodes a space).
pub fn qr_matrix(value: &str) -> Result<QrMatrix, EncodingError> {
    let data = if value.is_empty() { " " } else { value };
    let code = QrCode::new(data.as_bytes()).map_err(|e| EncodingError::Rejected {
        symbology: BarcodeType::Qr,
        reason: e.to_string(),
    })?;

    Ok(QrMatrix {
        width: code.width(),
        modules: code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect(),
    })
}

// =============================================================================
// Renderer
// =============================================================================

/// Stateless apart from a per-instance memo of encoded payloads.
///
/// Owned by one barcode view; dropping the view drops the memo.
pub struct BarcodeRenderer<E = BarcodersEncoder> {
    options: RenderOptions,
    encoder: E,
    memo: HashMap<(String, BarcodeType), Result<EncodedBars, EncodingError>>,
}

impl BarcodeRenderer<BarcodersEncoder> {
    /// Creates a renderer using the `barcoders` encoder.
    pub fn new(options: RenderOptions) -> Self {
        BarcodeRenderer::with_encoder(options, BarcodersEncoder)
    }
}

impl<E: SymbologyEncoder> BarcodeRenderer<E> {
    /// Creates a renderer around a custom encoder.
    pub fn with_encoder(options: RenderOptions, encoder: E) -> Self {
        BarcodeRenderer {
            options,
            encoder,
            memo: HashMap::new(),
        }
    }

    /// Current render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders `value` with the configured canvas size.
    pub fn render(&mut self, value: &str, symbology: BarcodeType) -> BarcodeLayout {
        let options = self.options;
        self.render_with(value, symbology, &options)
    }

    /// Renders `value` on a `width` × `height` canvas.
    pub fn render_sized(
        &mut self,
        value: &str,
        symbology: BarcodeType,
        width: f32,
        height: f32,
    ) -> BarcodeLayout {
        let options = RenderOptions {
            width,
            height,
            ..self.options
        };
        self.render_with(value, symbology, &options)
    }

    fn render_with(
        &mut self,
        value: &str,
        symbology: BarcodeType,
        options: &RenderOptions,
    ) -> BarcodeLayout {
        let caption = options.show_value.then(|| value.to_string());

        if symbology == BarcodeType::Qr {
            let value = if value.is_empty() { " " } else { value };
            return BarcodeLayout::Qr {
                value: value.to_string(),
                size: options.qr_size(),
                caption,
            };
        }

        let encoded = match self.encoded(value, symbology) {
            Ok(encoded) if !encoded.runs.is_empty() && encoded.total_width > 0 => encoded,
            Ok(_) => {
                return BarcodeLayout::Invalid {
                    reason: format!("{} produced no bars", symbology),
                }
            }
            Err(e) => {
                return BarcodeLayout::Invalid {
                    reason: e.to_string(),
                }
            }
        };

        let canvas_width = options.available_width();
        let scale = canvas_width / encoded.total_width as f32;
        let bars = encoded
            .runs
            .iter()
            .map(|&(x, width)| Bar {
                x: x as f32 * scale,
                width: width as f32 * scale,
            })
            .collect();

        BarcodeLayout::Linear {
            bars,
            bar_height: options.bar_height(),
            canvas_width,
            caption,
        }
    }

    fn encoded(
        &mut self,
        value: &str,
        symbology: BarcodeType,
    ) -> Result<&EncodedBars, EncodingError> {
        let key = (value.to_string(), symbology);
        if !self.memo.contains_key(&key) {
            let result = self
                .encoder
                .encode(value, symbology)
                .map(|modules| bars_from_modules(&modules));
            if let Err(e) = &result {
                warn!(symbology = %symbology, error = %e, "Barcode generation failed");
            }
            self.memo.insert(key.clone(), result);
        }

        match &self.memo[&key] {
            Ok(encoded) => Ok(encoded),
            Err(e) => Err(e.clone()),
        }
    }

    /// Number of memoized `(value, type)` pairs.
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Returns a fixed pattern and counts calls.
    struct FixedEncoder {
        modules: Vec<u8>,
        calls: Arc<AtomicUsize>,
    }

    impl SymbologyEncoder for FixedEncoder {
        fn encode(&self, _value: &str, _symbology: BarcodeType) -> Result<Vec<u8>, EncodingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.modules.clone())
        }
    }

    fn fixed(modules: Vec<u8>) -> (BarcodeRenderer<FixedEncoder>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let encoder = FixedEncoder {
            modules,
            calls: calls.clone(),
        };
        (
            BarcodeRenderer::with_encoder(RenderOptions::sized(200.0, 100.0), encoder),
            calls,
        )
    }

    #[test]
    fn test_bars_from_modules_trailing_run() {
        let encoded = bars_from_modules(&[0, 1, 1, 1]);
        assert_eq!(encoded.runs, vec![(1, 3)]);
        assert_eq!(encoded.total_width, 4);
    }

    #[test]
    fn test_linear_layout_is_scaled() {
        // 10 modules on a 200px canvas: scale 20
        let (mut renderer, _) = fixed(vec![1, 1, 0, 1, 0, 0, 0, 1, 1, 1]);
        let layout = renderer.render("123", BarcodeType::Code128);

        match layout {
            BarcodeLayout::Linear {
                bars,
                bar_height,
                canvas_width,
                caption,
            } => {
                assert_eq!(
                    bars,
                    vec![
                        Bar { x: 0.0, width: 40.0 },
                        Bar { x: 60.0, width: 20.0 },
                        Bar { x: 140.0, width: 60.0 },
                    ]
                );
                assert_eq!(bar_height, 70.0);
                assert_eq!(canvas_width, 200.0);
                assert_eq!(caption.as_deref(), Some("123"));
            }
            other => panic!("expected linear layout, got {:?}", other),
        }
    }

    #[test]
    fn test_padding_and_hidden_caption() {
        let options = RenderOptions {
            width: 232.0,
            height: 100.0,
            padding: 16.0,
            show_value: false,
        };
        assert_eq!(options.available_width(), 200.0);
        assert_eq!(options.bar_height(), 84.0);
        assert_eq!(options.qr_size(), 68.0);
    }

    #[test]
    fn test_hidden_caption_is_dropped_from_layouts() {
        let options = RenderOptions {
            show_value: false,
            ..RenderOptions::sized(200.0, 100.0)
        };
        let calls = Arc::new(AtomicUsize::new(0));
        let encoder = FixedEncoder {
            modules: vec![1, 0, 1],
            calls,
        };
        let mut renderer = BarcodeRenderer::with_encoder(options, encoder);

        match renderer.render("123", BarcodeType::Code128) {
            BarcodeLayout::Linear {
                caption, bar_height, ..
            } => {
                assert_eq!(caption, None);
                assert_eq!(bar_height, 100.0);
            }
            other => panic!("expected linear layout, got {:?}", other),
        }

        match renderer.render("123", BarcodeType::Qr) {
            BarcodeLayout::Qr { caption, size, .. } => {
                assert_eq!(caption, None);
                assert_eq!(size, 100.0);
            }
            other => panic!("expected QR layout, got {:?}", other),
        }
    }

    #[test]
    fn test_render_is_memoized_per_value_and_type() {
        let (mut renderer, calls) = fixed(vec![1, 0, 1]);
        renderer.render("123", BarcodeType::Code128);
        renderer.render("123", BarcodeType::Code128);
        renderer.render_sized("123", BarcodeType::Code128, 400.0, 50.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        renderer.render("123", BarcodeType::Code39);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(renderer.memoized(), 2);
    }

    #[test]
    fn test_no_bars_is_invalid() {
        let (mut renderer, _) = fixed(vec![0, 0, 0]);
        assert!(renderer.render("x", BarcodeType::Code128).is_invalid());
    }

    #[test]
    fn test_qr_layout_uses_smaller_side() {
        let mut renderer = BarcodeRenderer::new(RenderOptions::sized(280.0, 100.0));
        let layout = renderer.render("https://example.com/member/42", BarcodeType::Qr);
        assert_eq!(
            layout,
            BarcodeLayout::Qr {
                value: "https://example.com/member/42".to_string(),
                size: 100.0,
                caption: Some("https://example.com/member/42".to_string()),
            }
        );
        assert_eq!(renderer.memoized(), 0);
    }

    #[test]
    fn test_empty_qr_value_renders_a_space() {
        let mut renderer = BarcodeRenderer::new(RenderOptions::sized(120.0, 160.0));
        match renderer.render("", BarcodeType::Qr) {
            BarcodeLayout::Qr { value, size, .. } => {
                assert_eq!(value, " ");
                assert_eq!(size, 120.0);
            }
            other => panic!("expected QR layout, got {:?}", other),
        }

        assert_eq!(qr_matrix("").unwrap(), qr_matrix(" ").unwrap());
    }

    #[test]
    fn test_qr_matrix() {
        let matrix = qr_matrix("6141290012345678").unwrap();
        assert!(matrix.width >= 21);
        assert_eq!(matrix.modules.len(), matrix.width * matrix.width);
        // Finder pattern corner is always dark
        assert!(matrix.is_dark(0, 0));
        assert!(!matrix.is_dark(matrix.width, 0));
    }

    #[test]
    fn test_ean13_rejects_letters() {
        let mut renderer = BarcodeRenderer::new(RenderOptions::default());
        let layout = renderer.render("ABC", BarcodeType::Ean13);
        assert!(layout.is_invalid());
    }

    #[test]
    fn test_ean13_check_digit() {
        assert_eq!(ean_check_digit("590123412345"), 7);
        assert_eq!(ean_check_digit("003600029145"), 2);

        let encoder = BarcodersEncoder;
        assert!(encoder.encode("5901234123457", BarcodeType::Ean13).is_ok());
        assert_eq!(
            encoder.encode("5901234123458", BarcodeType::Ean13),
            Err(EncodingError::ChecksumMismatch {
                symbology: BarcodeType::Ean13,
                expected: 7,
                actual: 8,
            })
        );
        assert!(matches!(
            encoder.encode("123", BarcodeType::Ean13),
            Err(EncodingError::InvalidLength { actual: 3, .. })
        ));
    }

    #[test]
    fn test_upc_lengths() {
        let encoder = BarcodersEncoder;
        assert!(encoder.encode("03600029145", BarcodeType::Upc).is_ok());
        assert!(encoder.encode("036000291452", BarcodeType::Upc).is_ok());
        assert!(matches!(
            encoder.encode("036000291453", BarcodeType::Upc),
            Err(EncodingError::ChecksumMismatch { expected: 2, .. })
        ));
    }

    #[test]
    fn test_code39_alphabet() {
        let encoder = BarcodersEncoder;
        assert!(encoder.encode("abc-123", BarcodeType::Code39).is_ok());
        assert_eq!(
            encoder.encode("A_B", BarcodeType::Code39),
            Err(EncodingError::InvalidCharacter {
                symbology: BarcodeType::Code39,
                character: '_',
            })
        );
    }

    #[test]
    fn test_code128_payload_sets() {
        assert_eq!(code128_payload("1234").unwrap(), "Ć1234");
        assert_eq!(code128_payload("123").unwrap(), "Ɓ123");
        assert_eq!(code128_payload("Costco 42").unwrap(), "ƁCostco 42");
        assert!(code128_payload("café").is_err());
    }

    #[test]
    fn test_real_linear_render_fits_canvas() {
        let mut renderer = BarcodeRenderer::new(RenderOptions::sized(280.0, 100.0));
        for (value, symbology) in [
            ("6141290012345678", BarcodeType::Code128),
            ("Target Circle", BarcodeType::Code128),
            ("5901234123457", BarcodeType::Ean13),
            ("CVS-42", BarcodeType::Code39),
            ("036000291452", BarcodeType::Upc),
            ("03600029145", BarcodeType::Upc),
        ] {
            match renderer.render(value, symbology) {
                BarcodeLayout::Linear { bars, .. } => {
                    assert!(!bars.is_empty());
                    let last = bars[bars.len() - 1];
                    assert!(last.x + last.width <= 280.0 + 0.01);
                }
                other => panic!("{} {:?} rendered as {:?}", symbology, value, other),
            }
        }
    }

    #[test]
    fn test_empty_linear_value_is_invalid() {
        let mut renderer = BarcodeRenderer::new(RenderOptions::default());
        assert!(renderer.render("", BarcodeType::Code128).is_invalid());
    }
}
