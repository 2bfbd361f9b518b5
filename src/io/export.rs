//! CSV exports: the availability report and the grouped vendor table.
//!
//! The report is meant to be opened directly in a spreadsheet; absent values
//! are written as empty cells rather than zeros.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{DateAxis, KeyedRow, ReportRow, format_number};
use crate::error::AppError;
use crate::report::Report;

pub fn write_report_csv(path: &Path, report: &Report) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report CSV '{}': {e}", path.display())))?;
    write_report(file, report)
}

/// Write the report to any writer.
pub fn write_report<W: Write>(writer: W, report: &Report) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(report.header.columns())
        .map_err(|e| AppError::new(2, format!("Failed to write report header: {e}")))?;

    let n_dates = report.header.columns().len() - crate::domain::constants::REPORT_COLUMNS.len();
    for row in &report.rows {
        wtr.write_record(report_record(row, n_dates))
            .map_err(|e| AppError::new(2, format!("Failed to write report row '{}': {e}", row.part_number)))?;
    }

    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush report CSV: {e}")))
}

fn report_record(row: &ReportRow, n_dates: usize) -> Vec<String> {
    let opt = |v: Option<f64>| v.map(format_number).unwrap_or_default();

    let mut record = vec![
        row.part_number.clone(),
        format_number(row.on_hand),
        format_number(row.backlog),
        opt(row.released),
        opt(row.held_for_release),
        format_number(row.on_order),
        format_number(row.total_availability),
        format_number(row.reserved_availability),
        format_number(row.reorder),
    ];

    match &row.schedule {
        Some(values) => record.extend((0..n_dates).map(|i| opt(values.get(i).copied()))),
        None => record.extend(std::iter::repeat_n(String::new(), n_dates)),
    }

    record
}

/// Dump the aggregated vendor rows (before validation) with their date headers.
pub fn write_grouped_csv(path: &Path, grouped: &[KeyedRow], dates: &DateAxis) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create grouped CSV '{}': {e}", path.display())))?;
    let mut wtr = csv::Writer::from_writer(file);

    let mut header = vec!["key".to_string()];
    header.extend(dates.labels().iter().cloned());
    wtr.write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write grouped CSV header: {e}")))?;

    for row in grouped {
        let mut record = vec![row.key.clone()];
        record.extend(row.quantities.iter().map(|q| format_number(*q)));
        wtr.write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write grouped CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush grouped CSV: {e}")))
}
