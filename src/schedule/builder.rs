//! Compose the reconciliation steps into a validated schedule.
//!
//! raw table -> keyed rows -> aggregate -> remap -> translate -> re-aggregate -> schedule

use crate::domain::{KeyedRow, Notice, RawTable, Schedule, TranslationMap, ValidationMap};
use crate::error::ScheduleError;
use crate::schedule::aggregate::aggregate;
use crate::schedule::extract::{check_shape, date_axis, keyed_rows};
use crate::schedule::validate::{ensure_finite, remap, translate};

/// Counts describing one schedule build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub data_rows: usize,
    pub vendor_keys: usize,
    pub ignored: usize,
    pub parts: usize,
    pub dates: usize,
}

/// Everything a successful build produces.
#[derive(Debug, Clone)]
pub struct ScheduleBuild {
    pub schedule: Schedule,
    /// Aggregated vendor rows before validation (for optional dumps).
    pub grouped: Vec<KeyedRow>,
    pub notices: Vec<Notice>,
    pub stats: BuildStats,
}

/// Build the schedule from a raw vendor table and the two lookup maps.
///
/// Either the full schedule is returned or nothing is: a translation miss on
/// any key fails the whole build after all misses have been reported.
pub fn build_schedule(
    table: &RawTable,
    validation: &ValidationMap,
    translation: &TranslationMap,
) -> Result<ScheduleBuild, ScheduleError> {
    check_shape(table)?;

    let dates = date_axis(table);
    let (rows, mut notices) = keyed_rows(table);
    let data_rows = rows.len();

    let grouped = aggregate(rows);
    let remapped = remap(grouped.clone(), validation);
    notices.extend(remapped.ignored.iter().map(|row| Notice::IgnoredRow {
        row: row.source_row,
        key: row.key.clone(),
    }));

    let translated = translate(remapped.rows, translation)?;

    // Several vendor keys may validate to one internal part.
    let merged = aggregate(translated);
    ensure_finite(&merged)?;
    let parts = merged.into_iter().map(|row| (row.key, row.quantities)).collect();

    let schedule = Schedule::new(dates, parts).map_err(ScheduleError::SourceShape)?;

    let stats = BuildStats {
        data_rows,
        vendor_keys: grouped.len(),
        ignored: remapped.ignored.len(),
        parts: schedule.len(),
        dates: schedule.dates().len(),
    };

    Ok(ScheduleBuild {
        schedule,
        grouped,
        notices,
        stats,
    })
}
