//! Plain text backend.

use flatext_core::{ExtractedText, FormatKind};
use tracing::debug;

use crate::error::FormatError;
use crate::traits::FormatExtractor;

/// Backend for `.txt` files.
///
/// Bytes are decoded as UTF-8; invalid sequences become U+FFFD. Never fails.
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for TextExtractor {
    fn kind(&self) -> FormatKind {
        FormatKind::Text
    }

    fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError> {
        debug!("Decoding {} bytes of text", content.len());
        Ok(ExtractedText::from(String::from_utf8_lossy(content).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(TextExtractor::new().kind(), FormatKind::Text);
    }

    #[test]
    fn test_passthrough() {
        let text = TextExtractor::new().extract(b"hello\nworld").unwrap();
        assert_eq!(text.as_str(), "hello\nworld");
    }

    #[test]
    fn test_whitespace_left_for_registry() {
        let text = TextExtractor::new().extract(b"  padded \n").unwrap();
        assert_eq!(text.as_str(), "  padded \n");
        assert_eq!(text.finish(), "padded");
    }

    #[test]
    fn test_unicode() {
        let text = TextExtractor::new()
            .extract("Привет мир 你好".as_bytes())
            .unwrap();
        assert_eq!(text.as_str(), "Привет мир 你好");
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let text = TextExtractor::new().extract(&[b'o', b'k', 0xFF, b'!']).unwrap();
        assert_eq!(text.as_str(), "ok\u{FFFD}!");
    }

    #[test]
    fn test_empty_input() {
        let text = TextExtractor::default().extract(b"").unwrap();
        assert!(text.is_empty());
    }
}
