//! Validation remapping (external -> internal keys) and translation factors.

use std::collections::BTreeMap;

use tracing::{error, info};

use crate::domain::constants::IGNORE_ME;
use crate::domain::{KeyedRow, TranslationMap, ValidationMap};
use crate::error::{ScheduleError, TranslationMiss};

/// Output of [`remap`]: surviving rows plus the rows dropped by the ignore sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Remapped {
    pub rows: Vec<KeyedRow>,
    pub ignored: Vec<KeyedRow>,
}

/// Rewrite every key through the validation map; unlisted keys pass through.
///
/// Rows whose resulting key is [`IGNORE_ME`] are moved to `ignored` and take no
/// further part in the run. Ignored rows keep their original (external) key.
pub fn remap(rows: Vec<KeyedRow>, validation: &ValidationMap) -> Remapped {
    let mut out = Remapped::default();

    for row in rows {
        let target = validation.get(&row.key).map(String::as_str).unwrap_or(&row.key);
        if target == IGNORE_ME {
            info!(row = row.source_row, key = %row.key, "Schedule Validation: Line #{} ignored", row.source_row);
            out.ignored.push(row);
            continue;
        }

        let key = target.to_string();
        out.rows.push(KeyedRow { key, ..row });
    }

    out
}

/// Multiply every quantity column by the row's translation factor.
///
/// All rows are checked before anything is scaled. If any key has no factor,
/// each distinct missing key is logged once (with the first row it appeared
/// on) and the whole batch fails. A product that leaves the `f64` range also
/// fails the batch.
pub fn translate(rows: Vec<KeyedRow>, translation: &TranslationMap) -> Result<Vec<KeyedRow>, ScheduleError> {
    let mut missing: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &rows {
        if !translation.contains_key(&row.key) {
            let first = missing.entry(row.key.as_str()).or_insert(row.source_row);
            *first = (*first).min(row.source_row);
        }
    }

    if !missing.is_empty() {
        let mut misses: Vec<TranslationMiss> = missing
            .into_iter()
            .map(|(key, row)| TranslationMiss {
                key: key.to_string(),
                row,
            })
            .collect();
        misses.sort_by_key(|m| m.row);

        for miss in &misses {
            error!(row = miss.row, key = %miss.key, "Schedule Validation: {} not found.", miss.key);
        }
        return Err(ScheduleError::TranslationCoverage { misses });
    }

    let translated: Vec<KeyedRow> = rows
        .into_iter()
        .map(|row| {
            let factor = translation.get(&row.key).copied().unwrap_or(1.0);
            KeyedRow {
                quantities: row.quantities.iter().map(|q| q * factor).collect(),
                ..row
            }
        })
        .collect();

    ensure_finite(&translated)?;
    Ok(translated)
}

/// Fail if any quantity is infinite or NaN, logging each offending key once.
pub fn ensure_finite(rows: &[KeyedRow]) -> Result<(), ScheduleError> {
    let mut out_of_range: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.quantities.iter().any(|q| !q.is_finite())) {
        let first = out_of_range.entry(row.key.as_str()).or_insert(row.source_row);
        *first = (*first).min(row.source_row);
    }
    if out_of_range.is_empty() {
        return Ok(());
    }

    let mut overflows: Vec<TranslationMiss> = out_of_range
        .into_iter()
        .map(|(key, row)| TranslationMiss {
            key: key.to_string(),
            row,
        })
        .collect();
    overflows.sort_by_key(|m| m.row);
    for miss in &overflows {
        error!(row = miss.row, key = %miss.key, "Schedule Validation: {} is out of range after translation.", miss.key);
    }
    Err(ScheduleError::QuantityOverflow { overflows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, quantities: &[f64], source_row: usize) -> KeyedRow {
        KeyedRow {
            key: key.to_string(),
            quantities: quantities.to_vec(),
            source_row,
        }
    }

    #[test]
    fn remap_rewrites_listed_keys_only() {
        let mut validation = ValidationMap::new();
        validation.insert("X1".to_string(), "P1".to_string());

        let out = remap(vec![row("X1", &[1.0], 6), row("P7", &[2.0], 7)], &validation);
        assert_eq!(out.rows, vec![row("P1", &[1.0], 6), row("P7", &[2.0], 7)]);
        assert!(out.ignored.is_empty());
    }

    #[test]
    fn remap_drops_ignore_sentinel() {
        let mut validation = ValidationMap::new();
        validation.insert("JUNK".to_string(), IGNORE_ME.to_string());

        let out = remap(vec![row("JUNK", &[9.0], 6), row("P1", &[1.0], 7)], &validation);
        assert_eq!(out.rows, vec![row("P1", &[1.0], 7)]);
        assert_eq!(out.ignored, vec![row("JUNK", &[9.0], 6)]);
    }

    #[test]
    fn translate_scales_each_row() {
        let mut translation = TranslationMap::new();
        translation.insert("P1".to_string(), 2.0);
        translation.insert("P2".to_string(), 0.5);

        let out = translate(vec![row("P1", &[3.0, 5.0], 6), row("P2", &[4.0, 0.0], 7)], &translation).unwrap();
        assert_eq!(out, vec![row("P1", &[6.0, 10.0], 6), row("P2", &[2.0, 0.0], 7)]);
    }

    #[test]
    fn translate_collects_all_misses_before_failing() {
        let mut translation = TranslationMap::new();
        translation.insert("P1".to_string(), 1.0);

        let err = translate(
            vec![
                row("P3", &[1.0], 9),
                row("P1", &[1.0], 6),
                row("P2", &[1.0], 7),
                row("P3", &[1.0], 8),
            ],
            &translation,
        )
        .unwrap_err();

        assert_eq!(
            err,
            ScheduleError::TranslationCoverage {
                misses: vec![
                    TranslationMiss { key: "P2".to_string(), row: 7 },
                    TranslationMiss { key: "P3".to_string(), row: 8 },
                ],
            }
        );
    }

    #[test]
    fn translate_rejects_out_of_range_products() {
        let mut translation = TranslationMap::new();
        translation.insert("P1".to_string(), 1e300);
        translation.insert("P2".to_string(), 2.0);

        let err = translate(vec![row("P2", &[1.0], 6), row("P1", &[1.0, 1e300], 7)], &translation).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::QuantityOverflow {
                overflows: vec![TranslationMiss { key: "P1".to_string(), row: 7 }],
            }
        );
    }

    #[test]
    fn finite_rows_pass_the_range_check() {
        assert!(ensure_finite(&[row("P1", &[f64::MAX, 0.0], 6)]).is_ok());
        assert!(ensure_finite(&[row("P1", &[f64::MAX * 2.0], 6)]).is_err());
    }
}
