//! Spreadsheet backend for `.xls` and `.xlsx` files.
//!
//! Only the first sheet is read. Its first row labels the columns and the
//! remaining rows are rendered as a right-aligned text table without row
//! labels:
//!
//! ```text
//!  name qty price
//! apple   3  1.50
//!  kiwi  12  0.25
//! ```

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use flatext_core::{ExtractedText, FormatKind};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::debug;

use crate::error::FormatError;
use crate::traits::FormatExtractor;

/// Rendering of a sheet with no cells at all.
pub const EMPTY_SHEET: &str = "Empty DataFrame\nColumns: []\nIndex: []";

/// Most decimals a float column is rendered with.
const MAX_DECIMALS: usize = 6;

/// Stand-in for cells past the end of a short row.
static EMPTY_CELL: Data = Data::Empty;

/// Backend for `.xls` and `.xlsx` files.
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    /// Create a new spreadsheet extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpreadsheetExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for SpreadsheetExtractor {
    fn kind(&self) -> FormatKind {
        FormatKind::Spreadsheet
    }

    fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(content))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| FormatError::Malformed("workbook has no sheets".to_string()))??;

        let (height, width) = range.get_size();
        debug!("Rendering first sheet: {} rows x {} columns", height, width);

        Ok(ExtractedText::from(render_table(&range)))
    }
}

// ============================================================================
// Table rendering
// ============================================================================

/// Render a sheet range as a text table, first row as column labels.
///
/// Rows with no values at all are dropped before rendering.
#[must_use]
pub fn render_table(range: &Range<Data>) -> String {
    let mut rows = range
        .rows()
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)));
    let Some(header) = rows.next() else {
        return EMPTY_SHEET.to_string();
    };

    let labels = column_labels(header);
    let body: Vec<&[Data]> = rows.collect();
    if body.is_empty() {
        return format!("Empty DataFrame\nColumns: [{}]\nIndex: []", labels.join(", "));
    }

    let columns: Vec<Vec<String>> = (0..labels.len())
        .map(|col| render_column(body.iter().map(|row| row.get(col).unwrap_or(&EMPTY_CELL))))
        .collect();

    let widths: Vec<usize> = labels
        .iter()
        .zip(&columns)
        .map(|(label, cells)| {
            cells
                .iter()
                .map(|cell| cell.chars().count())
                .fold(label.chars().count(), usize::max)
        })
        .collect();

    let mut lines = Vec::with_capacity(body.len() + 1);
    lines.push(join_aligned(labels.iter().map(String::as_str), &widths));
    for row in 0..body.len() {
        lines.push(join_aligned(
            columns.iter().map(|cells| cells[row].as_str()),
            &widths,
        ));
    }
    lines.join("\n")
}

fn join_aligned<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header labels; blank headers become `Unnamed: N`, repeats get a `.N` suffix.
fn column_labels(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let label = match cell {
                Data::Empty => format!("Unnamed: {index}"),
                other => cell_text(other),
            };
            let count = seen.entry(label.clone()).or_insert(0);
            let label = if *count == 0 {
                label
            } else {
                format!("{label}.{count}")
            };
            *count += 1;
            label
        })
        .collect()
}

/// How the values of one column are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnStyle {
    /// Every cell numeric, whole and present.
    Integer,
    /// Numeric with fractions or gaps: shared decimal count.
    Float(usize),
    /// Anything else: each cell on its own terms.
    Mixed,
}

fn column_style<'a>(cells: impl Iterator<Item = &'a Data>) -> ColumnStyle {
    let mut numeric = false;
    let mut whole = true;
    let mut gaps = false;
    let mut decimals = 1;

    for cell in cells {
        match cell {
            Data::Int(_) => numeric = true,
            Data::Float(f) => {
                numeric = true;
                if f.is_finite() {
                    let needed = decimals_needed(*f);
                    if needed > 0 {
                        whole = false;
                    }
                    decimals = decimals.max(needed);
                } else {
                    whole = false;
                }
            }
            Data::Empty => gaps = true,
            _ => return ColumnStyle::Mixed,
        }
    }

    match (numeric, whole && !gaps) {
        (false, _) => ColumnStyle::Mixed,
        (true, true) => ColumnStyle::Integer,
        (true, false) => ColumnStyle::Float(decimals),
    }
}

fn render_column<'a>(cells: impl Iterator<Item = &'a Data> + Clone) -> Vec<String> {
    let style = column_style(cells.clone());
    cells.map(|cell| render_cell(cell, style)).collect()
}

#[allow(clippy::cast_precision_loss)]
fn render_cell(cell: &Data, style: ColumnStyle) -> String {
    match (style, cell) {
        (_, Data::Empty) => "NaN".to_string(),
        (ColumnStyle::Integer, Data::Float(f)) => format!("{f:.0}"),
        (ColumnStyle::Float(decimals), Data::Float(f)) => format_float(*f, decimals),
        (ColumnStyle::Float(decimals), Data::Int(i)) => format_float(*i as f64, decimals),
        (_, other) => cell_text(other),
    }
}

fn format_float(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{value:.decimals$}")
    }
}

/// Decimals needed to show `value` exactly, capped at [`MAX_DECIMALS`].
fn decimals_needed(value: f64) -> usize {
    let precision = MAX_DECIMALS;
    let formatted = format!("{value:.precision$}");
    formatted
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.trim_end_matches('0').len())
}

/// Text of a single cell outside of any column formatting.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
        Data::Float(f) => format_float(*f, decimals_needed(*f).max(1)),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                dt.as_duration()
                    .map_or_else(|| dt.as_f64().to_string(), format_duration)
            } else {
                dt.as_datetime()
                    .map_or_else(|| dt.as_f64().to_string(), format_datetime)
            }
        }
        Data::Error(e) => e.to_string(),
        Data::Empty => "NaN".to_string(),
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn format_duration(value: TimeDelta) -> String {
    let days = value.num_days();
    let rest = value - TimeDelta::days(days);
    let seconds = rest.num_seconds();
    format!(
        "{days} days {:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
