//! Word-processing backend for `.docx` files.

use docx_rs::{Break, BreakType, DocumentChild, Paragraph, ParagraphChild, Run, RunChild};
use flatext_core::{ExtractedText, FormatKind};
use tracing::debug;

use crate::error::FormatError;
use crate::traits::FormatExtractor;

/// Backend for `.docx` files.
///
/// Emits one line per body paragraph, in document order. Empty paragraphs
/// produce blank lines; tables, headers and footers are not read.
pub struct WordExtractor;

impl WordExtractor {
    /// Create a new Word extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for WordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for WordExtractor {
    fn kind(&self) -> FormatKind {
        FormatKind::WordDoc
    }

    fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError> {
        let docx = docx_rs::read_docx(content)?;

        let mut text = ExtractedText::new();
        let mut paragraphs = 0usize;
        for child in &docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                text.push_line(&paragraph_text(paragraph));
                paragraphs += 1;
            }
        }

        debug!("Extracted {} paragraphs from docx", paragraphs);
        Ok(text)
    }
}

/// Concatenated text of a paragraph's runs, including runs inside hyperlinks.
fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut out = String::new();
    push_children(&paragraph.children, &mut out);
    out
}

fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::CarriageReturn(_) => out.push('\n'),
            // Page and column breaks add nothing to the text.
            RunChild::Break(br) if *br == Break::new(BreakType::TextWrapping) => out.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::Docx;
    use std::io::Cursor;

    fn pack(docx: Docx) -> Vec<u8> {
        let mut bytes = Vec::new();
        docx.build().pack(Cursor::new(&mut bytes)).unwrap();
        bytes
    }

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn test_kind() {
        assert_eq!(WordExtractor::new().kind(), FormatKind::WordDoc);
    }

    #[test]
    fn test_paragraphs_joined_by_newline() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(para("First paragraph"))
                .add_paragraph(para("Second paragraph")),
        );
        let text = WordExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text.finish(), "First paragraph\nSecond paragraph");
    }

    #[test]
    fn test_empty_paragraph_gives_blank_line() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(para("above"))
                .add_paragraph(Paragraph::new())
                .add_paragraph(para("below")),
        );
        let text = WordExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text.finish(), "above\n\nbelow");
    }

    #[test]
    fn test_runs_concatenate() {
        let paragraph = Paragraph::new()
            .add_run(Run::new().add_text("Hello"))
            .add_run(Run::new().add_text("World").bold());
        let bytes = pack(Docx::new().add_paragraph(paragraph));
        let text = WordExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text.finish(), "HelloWorld");
    }

    #[test]
    fn test_tab_and_break() {
        let run = Run::new()
            .add_text("name")
            .add_tab()
            .add_text("value")
            .add_break(BreakType::TextWrapping)
            .add_text("next");
        let bytes = pack(Docx::new().add_paragraph(Paragraph::new().add_run(run)));
        let text = WordExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text.finish(), "name\tvalue\nnext");
    }

    #[test]
    fn test_page_and_column_breaks_add_nothing() {
        let run = Run::new()
            .add_text("end")
            .add_break(BreakType::Page)
            .add_text("start")
            .add_break(BreakType::Column)
            .add_text("again");
        let bytes = pack(Docx::new().add_paragraph(Paragraph::new().add_run(run)));
        let text = WordExtractor::new().extract(&bytes).unwrap();
        assert_eq!(text.finish(), "endstartagain");
    }

    #[test]
    fn test_not_a_zip_fails() {
        let err = WordExtractor::new().extract(b"plain bytes").unwrap_err();
        assert!(matches!(err, FormatError::Word(_)));
    }
}
