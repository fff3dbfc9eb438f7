// Spreadsheet access: turns workbook bytes into typed rows.
//
// Damodaran's workbooks open with several rows of prose before the actual
// table, and the header cells carry stray line breaks and double spaces
// ("Unlevered beta\ncorrected for cash"). Rather than skipping a fixed
// number of rows, we normalize every cell and look for the first row that
// carries all the columns we need.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use regex_lite::Regex;
use tracing::debug;

/// How far down a sheet to look for the header row.
pub const HEADER_SCAN_ROWS: usize = 40;

/// A single spreadsheet cell, reduced to what the parsers care about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Cell content as display text. Numbers are rendered without
    /// formatting, empty cells as "".
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    /// Coerce the cell to a number, or None if it isn't one.
    ///
    /// Text is trimmed and parsed; a trailing `%` is treated as a percent
    /// and divided by 100. Empty, unparsable, and non-finite values all
    /// become None, so they drop out of any computation.
    pub fn number(&self) -> Option<f64> {
        let value = match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => parse_numeric_text(s),
        };
        value.filter(|v| v.is_finite())
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::String(s) => {
                if s.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.clone())
                }
            }
            Data::Empty => Cell::Empty,
            // Booleans, dates, and #N/A errors are never valid numbers here.
            // Keep their text so they still read as names.
            other => Cell::Text(other.to_string()),
        }
    }
}

fn parse_numeric_text(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Some(pct) = trimmed.strip_suffix('%') {
        return pct.trim().parse::<f64>().ok().map(|v| v / 100.0);
    }
    trimmed.parse::<f64>().ok()
}

/// Which worksheet to read from a workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetSelector {
    /// Zero-based sheet position.
    Index(usize),
    /// Sheet name, matched case-insensitively after trimming.
    Name(String),
}

impl SheetSelector {
    /// Parse a config value: a bare integer selects by index, anything
    /// else by name.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<usize>() {
            Ok(i) => SheetSelector::Index(i),
            Err(_) => SheetSelector::Name(raw.trim().to_string()),
        }
    }
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "sheet #{i}"),
            SheetSelector::Name(n) => write!(f, "sheet \"{n}\""),
        }
    }
}

/// Open an xls/xlsx workbook from memory and return one sheet as typed rows.
pub fn read_workbook_sheet(bytes: Vec<u8>, selector: &SheetSelector) -> Result<Vec<Vec<Cell>>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("Failed to open workbook")?;

    let range = match selector {
        SheetSelector::Index(i) => workbook
            .worksheet_range_at(*i)
            .ok_or_else(|| anyhow::anyhow!("Workbook has no {selector}"))?
            .with_context(|| format!("Failed to read {selector}"))?,
        SheetSelector::Name(wanted) => {
            let names = workbook.sheet_names();
            let actual = names
                .iter()
                .find(|n| n.trim().eq_ignore_ascii_case(wanted))
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Workbook has no {selector} (available: {})",
                        names.join(", ")
                    )
                })?;
            workbook
                .worksheet_range(&actual)
                .with_context(|| format!("Failed to read {selector}"))?
        }
    };

    let rows = range_to_rows(&range);
    debug!(rows = rows.len(), sheet = %selector, "Read worksheet");
    Ok(rows)
}

fn range_to_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect()
}

/// Collapse internal whitespace runs to single spaces and trim.
pub fn normalize_header(raw: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
    re.replace_all(raw, " ").trim().to_string()
}

/// A located header row: where it sits and which column each name maps to.
#[derive(Debug, Clone)]
pub struct HeaderRow {
    /// Row index of the header within the sheet.
    pub row: usize,
    columns: HashMap<String, usize>,
}

impl HeaderRow {
    /// Column index for a header name (compared case-insensitively after
    /// normalization).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns
            .get(&normalize_header(name).to_lowercase())
            .copied()
    }

    /// Like `column`, but a missing column is an error naming the sheet.
    pub fn require(&self, name: &str, what: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| anyhow::anyhow!("{what}: header row has no \"{name}\" column"))
    }
}

/// Find the first row (within `HEADER_SCAN_ROWS`) containing every required
/// column name. Duplicate header names resolve to their first occurrence.
pub fn locate_header(rows: &[Vec<Cell>], required: &[&str]) -> Option<HeaderRow> {
    let wanted: Vec<String> = required
        .iter()
        .map(|r| normalize_header(r).to_lowercase())
        .collect();

    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .find_map(|(i, row)| {
            let mut columns = HashMap::new();
            for (col, cell) in row.iter().enumerate() {
                let key = normalize_header(&cell.text()).to_lowercase();
                if !key.is_empty() {
                    columns.entry(key).or_insert(col);
                }
            }
            wanted
                .iter()
                .all(|w| columns.contains_key(w))
                .then_some(HeaderRow { row: i, columns })
        })
}

/// Fetch a cell from a row, treating out-of-bounds as empty.
pub fn cell_at(row: &[Cell], col: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    row.get(col).unwrap_or(&EMPTY)
}
