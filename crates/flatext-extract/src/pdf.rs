//! PDF backend.
//!
//! Pages are walked in page-number order with lopdf. Each page's text has
//! its trailing line breaks removed; pages with no text are skipped and the
//! rest are joined with a single newline.

use flatext_core::{ExtractedText, FormatKind};
use lopdf::Document;
use tracing::debug;

use crate::error::FormatError;
use crate::traits::FormatExtractor;

/// Backend for `.pdf` files.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for PdfExtractor {
    fn kind(&self) -> FormatKind {
        FormatKind::Pdf
    }

    fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError> {
        let doc = Document::load_mem(content)?;
        let pages = doc.get_pages();
        debug!("Extracting PDF: {} pages", pages.len());

        let mut text = ExtractedText::new();
        for &page_num in pages.keys() {
            let page_text = doc.extract_text(&[page_num])?;
            let page_text = page_text.trim_end_matches(['\n', '\r']);
            if page_text.is_empty() {
                debug!("Page {} has no text", page_num);
                continue;
            }
            text.push_line(page_text);
        }

        Ok(text)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(PdfExtractor::new().kind(), FormatKind::Pdf);
    }

    #[test]
    fn test_single_page() {
        let bytes = pdf_with_pages(&["Hello World"]);
        let text = PdfExtractor::new().extract(&bytes).unwrap().finish();
        assert!(text.contains("Hello World"), "got {text:?}");
    }

    #[test]
    fn test_pages_in_order() {
        let bytes = pdf_with_pages(&["First page", "Second page"]);
        let text = PdfExtractor::new().extract(&bytes).unwrap().finish();

        let first = text.find("First page").expect("first page text");
        let second = text.find("Second page").expect("second page text");
        assert!(first < second);
        assert_eq!(text.lines().filter(|l| l.trim().is_empty()).count(), 0);
    }

    #[test]
    fn test_corrupt_pdf_fails() {
        let err = PdfExtractor::new()
            .extract(b"%PDF-1.4 this is not really a pdf")
            .unwrap_err();
        assert!(matches!(err, FormatError::Pdf(_)));
        assert!(err.to_string().starts_with("invalid PDF"));
    }

    #[test]
    fn test_not_a_pdf_at_all() {
        assert!(PdfExtractor::default().extract(b"").is_err());
    }
}
