//! Formatted terminal output.
//!
//! Formatting lives here so the pipeline code only produces values and the
//! app layer decides what to print.

use std::time::Duration;

use crate::domain::{Notice, ReportRow};
use crate::report::Report;
use crate::schedule::BuildStats;

/// Summary of a schedule build.
pub fn format_schedule_summary(stats: &BuildStats, notices: &[Notice], elapsed: Duration) -> String {
    let malformed = notices
        .iter()
        .filter(|n| matches!(n, Notice::MalformedKey { .. }))
        .count();

    let mut out = String::new();
    out.push_str("=== materials - schedule ===\n");
    out.push_str(&format!(
        "Rows: {} read | {} vendor keys | {} ignored | {} malformed labels\n",
        stats.data_rows, stats.vendor_keys, stats.ignored, malformed
    ));
    out.push_str(&format!("Schedule: {} parts x {} dates\n", stats.parts, stats.dates));
    out.push_str(&format!("Success: {:.3} seconds\n", elapsed.as_secs_f64()));
    out
}

/// Summary of a composed report, with the parts whose reserved availability is below reorder.
pub fn format_report_summary(report: &Report, top_n: usize) -> String {
    let scheduled = report.rows.iter().filter(|r| r.schedule.is_some()).count();
    let mut short: Vec<&ReportRow> = report
        .rows
        .iter()
        .filter(|r| r.reserved_availability < r.reorder)
        .collect();
    short.sort_by(|a, b| {
        shortfall(b)
            .partial_cmp(&shortfall(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut out = String::new();
    out.push_str("=== materials - report ===\n");
    out.push_str(&format!(
        "Parts: {} | on schedule: {} | below reorder: {}\n",
        report.rows.len(),
        scheduled,
        short.len()
    ));

    if short.is_empty() {
        return out;
    }

    out.push('\n');
    out.push_str(&format!(
        "{:<24} {:>12} {:>12} {:>12}\n",
        "part", "r-avail", "reorder", "short"
    ));
    out.push_str(&format!("{:-<24} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));
    for r in short.iter().take(top_n) {
        out.push_str(&format!(
            "{:<24} {:>12.2} {:>12.2} {:>12.2}\n",
            truncate(&r.part_number, 24),
            r.reserved_availability,
            r.reorder,
            shortfall(r),
        ));
    }

    out
}

fn shortfall(row: &ReportRow) -> f64 {
    row.reorder - row.reserved_availability
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
