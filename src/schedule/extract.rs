//! Slice the raw vendor grid into a date axis and keyed quantity rows.
//!
//! Layout of the vendor sheet:
//! - row 3 holds the date labels
//! - rows 5.. are data rows
//! - column 0 is the part label, columns 1..4 are vendor metadata (discarded)

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::domain::constants::{DATE_ROW, FIRST_DATA_ROW, FIRST_QTY_COL, MIN_COLS, MIN_ROWS};
use crate::domain::{DateAxis, KeyedRow, Notice, RawTable};
use crate::error::ScheduleError;
use crate::schedule::key::normalize_key;

/// Reject tables smaller than the fixed vendor layout.
pub fn check_shape(table: &RawTable) -> Result<(), ScheduleError> {
    let (rows, cols) = (table.n_rows(), table.n_cols());
    if rows < MIN_ROWS {
        return Err(ScheduleError::SourceShape(format!("needs >= {MIN_ROWS} rows, got {rows}")));
    }
    if cols < MIN_COLS {
        return Err(ScheduleError::SourceShape(format!("needs >= {MIN_COLS} columns, got {cols}")));
    }
    Ok(())
}

/// Date labels for every quantity column.
pub fn date_axis(table: &RawTable) -> DateAxis {
    let labels = (FIRST_QTY_COL..table.n_cols())
        .map(|col| format_date_label(&table.cell(DATE_ROW, col).label()))
        .collect();
    DateAxis::new(labels)
}

/// Data rows reduced to `(canonical key, quantities)`.
///
/// Labels without a leading token are kept verbatim and reported as notices.
pub fn keyed_rows(table: &RawTable) -> (Vec<KeyedRow>, Vec<Notice>) {
    let n_cols = table.n_cols();
    let mut rows = Vec::with_capacity(table.n_rows().saturating_sub(FIRST_DATA_ROW));
    let mut notices = Vec::new();

    for idx in FIRST_DATA_ROW..table.n_rows() {
        let source_row = idx + 1;
        let label = table.cell(idx, 0).label();
        let normalized = normalize_key(&label);
        if !normalized.matched {
            warn!(row = source_row, label = %label, "label has no part-number token, using it as-is");
            notices.push(Notice::MalformedKey {
                row: source_row,
                label: label.clone(),
            });
        }

        let quantities = (FIRST_QTY_COL..n_cols)
            .map(|col| table.cell(idx, col).quantity())
            .collect();

        rows.push(KeyedRow {
            key: normalized.key.to_string(),
            quantities,
            source_row,
        });
    }

    (rows, notices)
}

/// Render a header cell as `MM/DD/YYYY` when it reads as a date; otherwise keep it.
///
/// Headers without a year (`"1/6"`) are rendered as `MM/DD`.
pub fn format_date_label(raw: &str) -> String {
    let s = raw.trim();

    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.date().format("%m/%d/%Y").to_string();
        }
    }

    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.format("%m/%d/%Y").to_string();
        }
    }

    // Leap year so that 2/29 is accepted.
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}/2000"), "%m/%d/%Y") {
        return d.format("%m/%d").to_string();
    }

    raw.to_string()
}
