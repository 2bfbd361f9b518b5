//! Shared domain types.
//!
//! The lookup maps and the schedule use `BTreeMap` so that persisted JSON and
//! report output come out in a stable order for identical inputs.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::constants::REPORT_COLUMNS;

/// One cell of the raw vendor grid.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Build a cell from already-trimmed text. Blank text is `Empty`.
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(text.to_string())
        }
    }

    /// Textual rendering of the cell (labels, date headers).
    pub fn label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => format_number(*v),
        }
    }

    /// Quantity value of the cell. Missing or non-numeric content counts as zero.
    pub fn quantity(&self) -> f64 {
        match self {
            Cell::Empty => 0.0,
            Cell::Number(v) if v.is_finite() => *v,
            Cell::Number(_) => 0.0,
            Cell::Text(s) => parse_quantity(s).unwrap_or(0.0),
        }
    }
}

/// Parse a vendor quantity: thousands separators and (full-width) blanks are ignored.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let v = cleaned.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Render a number without a trailing `.0` for integral values.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// The parsed vendor grid, row-major. Rows may be ragged; missing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// A row reduced to its canonical key and quantity columns.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRow {
    pub key: String,
    pub quantities: Vec<f64>,
    /// 1-based position in the raw table of the first row that contributed.
    pub source_row: usize,
}

/// Ordered date labels, positionally aligned with every schedule entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateAxis(Vec<String>);

impl DateAxis {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Report headers for the date columns: `"<label>-<1-based position>"`.
    ///
    /// Vendor sheets repeat labels (e.g. two weeks both titled "1/6"), so the
    /// position keeps the headers unique.
    pub fn column_headers(&self) -> Vec<String> {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, label)| format!("{label}-{}", idx + 1))
            .collect()
    }
}

/// External vendor key -> internal part number.
pub type ValidationMap = BTreeMap<String, String>;

/// Internal part number -> quantity conversion factor.
pub type TranslationMap = BTreeMap<String, f64>;

/// Part number -> aggregated quantity (backlog, held-for-release).
pub type QuantityMap = BTreeMap<String, f64>;

/// Validated, translated per-part quantities, aligned with a date axis.
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    dates: DateAxis,
    parts: BTreeMap<String, Vec<f64>>,
}

impl Schedule {
    /// Build a schedule, rejecting any entry whose length differs from the date axis.
    pub fn new(dates: DateAxis, parts: BTreeMap<String, Vec<f64>>) -> Result<Self, String> {
        if let Some((part, values)) = parts.iter().find(|(_, v)| v.len() != dates.len()) {
            return Err(format!(
                "schedule entry `{part}` has {} values but the date axis has {}",
                values.len(),
                dates.len()
            ));
        }
        Ok(Self { dates, parts })
    }

    pub fn dates(&self) -> &DateAxis {
        &self.dates
    }

    pub fn parts(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.parts
    }

    pub fn get(&self, part: &str) -> Option<&[f64]> {
        self.parts.get(part).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Static per-part attributes from the catalog export.
#[derive(Debug, Clone, PartialEq)]
pub struct PartCatalogRow {
    pub part_number: String,
    pub on_hand: f64,
    pub on_order: f64,
    pub reorder: f64,
}

/// One output row of the availability report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub part_number: String,
    pub on_hand: f64,
    pub backlog: f64,
    /// Only set when the part has a held-for-release entry.
    pub released: Option<f64>,
    pub held_for_release: Option<f64>,
    pub on_order: f64,
    pub total_availability: f64,
    pub reserved_availability: f64,
    pub reorder: f64,
    /// Per-date quantities, only when the part is on the schedule.
    pub schedule: Option<Vec<f64>>,
}

/// Column layout of a report, built fresh for each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    columns: Vec<String>,
}

impl ReportHeader {
    pub fn new(dates: &DateAxis) -> Self {
        let mut columns: Vec<String> = REPORT_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(dates.column_headers());
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Non-fatal events raised while building the schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The label had no leading part-number token and was used verbatim.
    MalformedKey { row: usize, label: String },
    /// The row was validation-mapped to the ignore sentinel and dropped.
    IgnoredRow { row: usize, key: String },
}

/// Where the raw schedule page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus `.env` and defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub source: SourceLocation,
    pub encoding: String,
    pub timeout_secs: u64,
    pub output: PathBuf,
    /// Optional CSV dump of the grouped (pre-validation) vendor table.
    pub dump_grouped: Option<PathBuf>,
}

impl RunConfig {
    /// Resolve a data file name against the data directory.
    pub fn data_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}
