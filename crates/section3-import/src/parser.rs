//! Delimited text → header-keyed rows.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

/// How quoted cells are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteMode {
    /// Split every line on `,` and strip surrounding quotes from each cell.
    /// A comma inside a quoted cell still splits it.
    #[default]
    Naive,
    /// RFC 4180 quoting: quoted cells may contain commas, doubled quotes and
    /// line breaks.
    Rfc4180,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("CSV file is empty")]
    Empty,
}

/// One data row. `line` is the 1-based physical line in the input where it
/// starts, blank lines included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub line: usize,
    pub fields: BTreeMap<String, String>,
}

impl ParsedRow {
    /// The cell under `column`, or `None` when absent or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

/// Parse `text` into rows keyed by the (lower-cased) header names.
///
/// Blank lines are skipped. Short rows simply lack their trailing fields;
/// cells beyond the last header are dropped.
pub fn parse_rows(text: &str, mode: QuoteMode) -> Result<ParsedCsv, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let records = match mode {
        QuoteMode::Naive => naive_records(text),
        QuoteMode::Rfc4180 => rfc4180_records(text),
    };

    let mut parsed = ParsedCsv::default();
    let mut header_seen = false;
    for (line, cells) in records {
        if !header_seen {
            parsed.headers = cells.iter().map(|c| c.to_ascii_lowercase()).collect();
            header_seen = true;
            continue;
        }
        let fields = parsed
            .headers
            .iter()
            .zip(cells)
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell))
            .collect();
        parsed.rows.push(ParsedRow { line, fields });
    }

    debug!(
        columns = parsed.headers.len(),
        rows = parsed.rows.len(),
        ?mode,
        "parsed csv"
    );
    Ok(parsed)
}

type Record = (usize, Vec<String>);

fn clean_cell(cell: &str) -> String {
    cell.trim().trim_matches('"').trim().to_string()
}

fn naive_records(text: &str) -> Vec<Record> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line.split(',').map(clean_cell).collect()))
        .collect()
}

fn rfc4180_records(text: &str) -> Vec<Record> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    // A flexible reader over UTF-8 text has no record-level failures left,
    // but the iterator still yields `Result`.
    let mut out = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "skipping unreadable CSV record");
                continue;
            }
        };
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let byte = record.position().map(|p| p.byte() as usize).unwrap_or_default();
        out.push((physical_line(text, byte), record.iter().map(str::to_string).collect()));
    }
    out
}

/// 1-based line of the first non-blank character at or after `byte`.
///
/// The reader reports a record as starting where the previous one ended, so
/// blank lines in between still have to be counted.
fn physical_line(text: &str, byte: usize) -> usize {
    let bytes = text.as_bytes();
    let byte = byte.min(bytes.len());
    let newlines = |slice: &[u8]| slice.iter().filter(|&&b| b == b'\n').count();
    let before = newlines(&bytes[..byte]);
    let gap = bytes[byte..]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len() - byte);
    before + newlines(&bytes[byte..byte + gap]) + 1
}
