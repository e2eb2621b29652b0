//! CSV backend.

use csv::{ReaderBuilder, StringRecord};
use flatext_core::{ExtractedText, FormatKind};
use tracing::debug;

use crate::error::FormatError;
use crate::traits::FormatExtractor;

/// Backend for `.csv` files.
///
/// Every record, the first included, becomes one line with its fields joined
/// by a single space. Rows may have differing field counts, and blank lines
/// between records are kept as empty lines. Input is decoded as UTF-8 with
/// invalid sequences replaced.
pub struct CsvExtractor;

impl CsvExtractor {
    /// Create a new CSV extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for CsvExtractor {
    fn kind(&self) -> FormatKind {
        FormatKind::Csv
    }

    fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError> {
        let decoded = String::from_utf8_lossy(content);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(decoded.as_bytes());

        let bytes = decoded.as_bytes();
        let mut text = ExtractedText::new();
        let mut record = StringRecord::new();
        let mut rows = 0usize;
        let mut start = 0usize;
        let mut after_cr = false;
        while reader.read_record(&mut record)? {
            let end = usize::try_from(reader.position().byte())
                .map_or(bytes.len(), |end| end.min(bytes.len()));

            for _ in 0..blank_lines(&bytes[start..end], after_cr) {
                text.push_line("");
            }
            text.push_line(&record.iter().collect::<Vec<_>>().join(" "));

            after_cr = bytes[..end].last() == Some(&b'\r');
            start = end;
            rows += 1;
        }

        debug!("Extracted {} CSV rows", rows);
        Ok(text)
    }
}

/// Number of empty lines at the head of `span`, the bytes consumed while
/// reading one record.
///
/// The reader stops between the `\r` and `\n` of a CRLF terminator, so when
/// the previous record ended on `\r` a leading `\n` belongs to it.
fn blank_lines(span: &[u8], after_cr: bool) -> usize {
    let mut terminators = span
        .iter()
        .copied()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .peekable();
    if after_cr {
        terminators.next_if_eq(&b'\n');
    }

    let mut lines = 0;
    while let Some(b) = terminators.next() {
        if b == b'\r' {
            terminators.next_if_eq(&b'\n');
        }
        lines += 1;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> String {
        CsvExtractor::new()
            .extract(input.as_bytes())
            .unwrap()
            .finish()
    }

    #[test]
    fn test_kind() {
        assert_eq!(CsvExtractor::new().kind(), FormatKind::Csv);
    }

    #[test]
    fn test_rows_joined_with_spaces() {
        assert_eq!(extract("a,b\nc,d\n"), "a b\nc d");
    }

    #[test]
    fn test_first_row_is_data() {
        let text = CsvExtractor::new().extract(b"name,age\nAda,36").unwrap();
        assert_eq!(text.as_str(), "name age\nAda 36\n");
    }

    #[test]
    fn test_quoted_fields() {
        assert_eq!(
            extract("\"Smith, John\",\"said \"\"hi\"\"\"\nx,y"),
            "Smith, John said \"hi\"\nx y"
        );
    }

    #[test]
    fn test_ragged_rows() {
        assert_eq!(extract("a,b,c\nd\ne,f"), "a b c\nd\ne f");
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(extract("a,b\r\nc,d\r\n"), "a b\nc d");
    }

    #[test]
    fn test_blank_line_kept_as_empty_row() {
        assert_eq!(extract("a,b\n\nc,d\n"), "a b\n\nc d");
    }

    #[test]
    fn test_several_blank_lines() {
        assert_eq!(extract("a\n\n\nb"), "a\n\n\nb");
        assert_eq!(extract("a,b\r\n\r\nc,d\r\n"), "a b\n\nc d");
    }

    #[test]
    fn test_blank_line_after_quoted_newline() {
        assert_eq!(extract("\"x\ny\",z\n\nw"), "x\ny z\n\nw");
    }

    #[test]
    fn test_blank_line_counting() {
        assert_eq!(blank_lines(b"a,b\n", false), 0);
        assert_eq!(blank_lines(b"\n\nc,d\n", false), 2);
        assert_eq!(blank_lines(b"\n\r\nc,d\r", true), 1);
        assert_eq!(blank_lines(b"\r\r\nx", false), 2);
    }

    #[test]
    fn test_empty_fields_keep_separators() {
        let text = CsvExtractor::new().extract(b"a,,c\n").unwrap();
        assert_eq!(text.as_str(), "a  c\n");
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let text = CsvExtractor::new().extract(&[b'a', 0xFF, b',', b'b']).unwrap();
        assert_eq!(text.finish(), "a\u{FFFD} b");
    }

    #[test]
    fn test_empty_input() {
        assert!(CsvExtractor::new().extract(b"").unwrap().is_empty());
    }
}
