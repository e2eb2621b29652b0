//! # flatext-extract
//!
//! Format backends and the dispatch registry that turns an uploaded file into
//! a flat string of text.
//!
//! The backend is chosen from the filename suffix alone; content is never
//! sniffed. Every backend produces an [`ExtractedText`](flatext_core::ExtractedText)
//! which the registry trims before returning.
//!
//! ## Supported Formats
//!
//! | Backend | Formats | Output |
//! |---------|---------|--------|
//! | [`TextExtractor`] | `.txt` | UTF-8 text, invalid bytes replaced |
//! | [`PdfExtractor`] | `.pdf` | Page texts joined by newline, empty pages skipped |
//! | [`ImageExtractor`] | `.jpg`, `.jpeg`, `.png`, `.bmp`, `.tiff` | OCR text via an [`OcrEngine`] |
//! | [`WordExtractor`] | `.docx` | One line per paragraph |
//! | [`SlideshowExtractor`] | `.pptx` | One line per text-bearing top-level shape |
//! | [`JsonExtractor`] | `.json` | Values of `text` keys, or the pretty-printed document |
//! | [`CsvExtractor`] | `.csv` | One line per row, fields space-separated |
//! | [`SpreadsheetExtractor`] | `.xls`, `.xlsx` | First sheet as an aligned text table |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flatext_extract::{ExtractConfig, ExtractorRegistry};
//!
//! let registry = ExtractorRegistry::with_defaults(&ExtractConfig::default());
//! let text = registry.extract(b"a,b\nc,d", "rows.csv")?;
//! assert_eq!(text, "a b\nc d");
//! ```
//!
//! ## OCR
//!
//! Image recognition goes through the [`OcrEngine`] trait. Building with the
//! `ocr` feature selects [`TesseractOcr`]; otherwise [`UnavailableOcr`] makes
//! image uploads fail with a processing error.
//!
//! ## Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ExtractorRegistry`] | Routes uploads to backends by filename suffix |
//! | [`FormatExtractor`] | Trait implemented by every backend |
//! | [`FormatError`] | Backend failure, mapped to `ExtractError::Processing` by the registry |
//! | [`ExtractConfig`] | Backend settings (OCR language and data path) |

pub mod config;
pub mod csv;
pub mod error;
pub mod image;
pub mod json;
pub mod ocr;
pub mod pdf;
pub mod registry;
pub mod slides;
pub mod spreadsheet;
pub mod text;
pub mod traits;
pub mod word;

pub use self::csv::CsvExtractor;
pub use self::image::ImageExtractor;
pub use config::{ExtractConfig, OcrConfig};
pub use error::FormatError;
pub use json::JsonExtractor;
#[cfg(feature = "ocr")]
pub use ocr::TesseractOcr;
pub use ocr::{OcrEngine, OcrError, UnavailableOcr, ocr_enabled};
pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use slides::{HasText, Shape, SlideshowExtractor, TextFrame};
pub use spreadsheet::SpreadsheetExtractor;
pub use text::TextExtractor;
pub use traits::FormatExtractor;
pub use word::WordExtractor;
