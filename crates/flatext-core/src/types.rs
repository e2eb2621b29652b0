//! Core types for flatext.
//!
//! ## Input
//! - [`Upload`]: raw bytes plus the filename used for dispatch
//!
//! ## Dispatch
//! - [`FormatKind`]: the extraction strategy selected from the filename suffix
//!
//! ## Output
//! - [`ExtractedText`]: accumulator for per-unit fragments (lines, paragraphs,
//!   rows, slide shapes)

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Uploads
// ============================================================================

/// A file handed to the extractor for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Raw file content
    pub content: Vec<u8>,
    /// Original filename, used only for extension matching
    pub filename: String,
}

impl Upload {
    /// Create a new upload.
    pub fn new(content: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
        }
    }

    /// The format selected by this upload's filename.
    #[must_use]
    pub fn kind(&self) -> FormatKind {
        FormatKind::from_filename(&self.filename)
    }

    /// Size of the content in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the upload carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// ============================================================================
// Format Kinds
// ============================================================================

/// Extraction strategy, derived from the filename suffix (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// `.txt`
    Text,
    /// `.pdf`
    Pdf,
    /// `.jpg`, `.jpeg`, `.png`, `.bmp`, `.tiff`
    Image,
    /// `.docx`
    WordDoc,
    /// `.pptx`
    Slideshow,
    /// `.json`
    Json,
    /// `.csv`
    Csv,
    /// `.xls`, `.xlsx`
    Spreadsheet,
    /// Anything else
    Unsupported,
}

impl FormatKind {
    /// Every kind that has an extraction strategy, in dispatch-table order.
    pub const SUPPORTED: [FormatKind; 8] = [
        FormatKind::Text,
        FormatKind::Pdf,
        FormatKind::Image,
        FormatKind::WordDoc,
        FormatKind::Slideshow,
        FormatKind::Json,
        FormatKind::Csv,
        FormatKind::Spreadsheet,
    ];

    /// Select the kind for a filename.
    ///
    /// Only the text after the last `.` is considered, lower-cased. Content is
    /// never inspected.
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        filename
            .rsplit_once('.')
            .map_or(Self::Unsupported, |(_, ext)| Self::from_extension(ext))
    }

    /// Select the kind for a bare extension (without the leading dot).
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        Self::SUPPORTED
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
            .unwrap_or(Self::Unsupported)
    }

    /// Recognized extensions for this kind.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Text => &["txt"],
            Self::Pdf => &["pdf"],
            Self::Image => &["jpg", "jpeg", "png", "bmp", "tiff"],
            Self::WordDoc => &["docx"],
            Self::Slideshow => &["pptx"],
            Self::Json => &["json"],
            Self::Csv => &["csv"],
            Self::Spreadsheet => &["xls", "xlsx"],
            Self::Unsupported => &[],
        }
    }

    /// Stable lowercase label.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::WordDoc => "word_doc",
            Self::Slideshow => "slideshow",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Spreadsheet => "spreadsheet",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether this kind has an extraction strategy.
    #[must_use]
    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Extracted Text
// ============================================================================

/// Plain text accumulated from per-unit fragments.
///
/// Backends push one fragment per line, paragraph, row or slide shape; each
/// fragment is terminated by a newline. [`ExtractedText::finish`] strips
/// leading and trailing whitespace from the whole buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    buf: String,
}

impl ExtractedText {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment followed by a newline.
    pub fn push_line(&mut self, fragment: &str) {
        self.buf.push_str(fragment);
        self.buf.push('\n');
    }

    /// Append raw text without a terminator.
    pub fn push_str(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Whether nothing has been pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The untrimmed buffer.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consume the buffer, returning the trimmed text.
    #[must_use]
    pub fn finish(self) -> String {
        let trimmed = self.buf.trim();
        if trimmed.len() == self.buf.len() {
            self.buf
        } else {
            trimmed.to_string()
        }
    }
}

impl From<String> for ExtractedText {
    fn from(buf: String) -> Self {
        Self { buf }
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtractedText {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut text = Self::new();
        for fragment in iter {
            text.push_line(fragment.as_ref());
        }
        text
    }
}
