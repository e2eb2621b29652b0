//! # flatext-core
//!
//! Core types and the error taxonomy shared by every flatext crate.
//!
//! flatext turns an uploaded file (plain text, PDF, image, Word document,
//! presentation, JSON, CSV or spreadsheet) into a single block of plain text.
//! This crate holds the pieces that do not depend on any parsing library:
//!
//! - **Uploads**: [`Upload`] pairs raw bytes with the filename used for dispatch
//! - **Format detection**: [`FormatKind`] is derived from the filename suffix only
//! - **Output**: [`ExtractedText`] accumulates fragments and trims the result
//! - **Errors**: [`ExtractError`] is the flat failure taxonomy callers see
//!
//! ## Architecture
//!
//! ```text
//! Upload ──► FormatKind::from_filename ──► backend (flatext-extract) ──► ExtractedText
//!                   │                              │
//!                   └── UnsupportedFormat          └── Processing
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Upload`] | Bytes plus filename for one extraction call |
//! | [`FormatKind`] | Extension-derived dispatch key |
//! | [`ExtractedText`] | Newline-joined fragment accumulator |
//! | [`ExtractError`] | `NoFileProvided`, `UnsupportedFormat`, `Processing` |
//!
//! ## Related Crates
//!
//! - `flatext-extract`: format backends and the dispatch registry
//! - `flatext`: command-line front end

pub mod error;
pub mod types;

pub use error::{ExtractError, Result};
pub use types::*;
