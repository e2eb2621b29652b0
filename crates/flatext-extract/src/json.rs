//! JSON backend.
//!
//! Collects the string values stored under keys named `text` (any case)
//! anywhere in the document. When there are none, the whole document is
//! pretty-printed instead, indented by two spaces with every non-ASCII
//! character written as a `\uXXXX` escape.

use flatext_core::{ExtractedText, FormatKind};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use serde_json::Value;
use std::io::{self, Write};
use tracing::debug;

use crate::error::FormatError;
use crate::traits::FormatExtractor;

/// Backend for `.json` files.
pub struct JsonExtractor;

impl JsonExtractor {
    /// Create a new JSON extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for JsonExtractor {
    fn kind(&self) -> FormatKind {
        FormatKind::Json
    }

    fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError> {
        let value: Value = serde_json::from_slice(content)?;

        let mut fields = Vec::new();
        collect_text_fields(&value, &mut fields);
        debug!("Found {} text fields in JSON", fields.len());

        if fields.is_empty() {
            return Ok(ExtractedText::from(to_ascii_pretty(&value)?));
        }
        Ok(ExtractedText::from(fields.join(" ")))
    }
}

/// Pre-order walk collecting string values under `text` keys.
///
/// Object keys are visited in document order. A matching key whose value is
/// not a string is descended into like any other value.
pub fn collect_text_fields<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::String(s) if key.to_lowercase() == "text" => out.push(s),
                    _ => collect_text_fields(child, out),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text_fields(item, out);
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

/// Pretty-print `value` as pure ASCII.
fn to_ascii_pretty(value: &Value) -> Result<String, FormatError> {
    let mut out = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut out, AsciiFormatter(PrettyFormatter::with_indent(b"  ")));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// [`PrettyFormatter`] that escapes DEL and everything above it, using
/// UTF-16 surrogate pairs outside the Basic Multilingual Plane.
struct AsciiFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiFormatter<'_> {
    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut plain = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '\u{7f}' {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[plain..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            plain = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[plain..])
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}
