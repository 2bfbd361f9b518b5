//! Availability report: catalog rows enriched with backlog, HFR, and schedule.

pub mod format;

pub use format::*;

use crate::domain::{PartCatalogRow, QuantityMap, ReportHeader, ReportRow, Schedule};

/// A composed report: column layout plus one row per catalog part.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub header: ReportHeader,
    pub rows: Vec<ReportRow>,
}

/// Merge the catalog with the auxiliary sources.
///
/// The catalog defines which parts appear, in catalog order. Backlog, HFR and
/// schedule entries for parts outside the catalog are ignored; parts missing
/// from those sources get zero/absent fields rather than an error.
pub fn compose_report(
    catalog: &[PartCatalogRow],
    schedule: &Schedule,
    backlog: &QuantityMap,
    held_for_release: &QuantityMap,
) -> Report {
    let rows = catalog
        .iter()
        .map(|part| compose_row(part, schedule, backlog, held_for_release))
        .collect();

    Report {
        header: ReportHeader::new(schedule.dates()),
        rows,
    }
}

fn compose_row(
    part: &PartCatalogRow,
    schedule: &Schedule,
    backlog: &QuantityMap,
    held_for_release: &QuantityMap,
) -> ReportRow {
    let key = part.part_number.as_str();
    let bl = backlog.get(key).copied().unwrap_or(0.0);
    let hfr = held_for_release.get(key).copied();

    // "Released" only means something once the part has an HFR entry.
    let released = hfr.map(|h| bl - h);

    let total_availability = part.on_hand + part.on_order - bl;
    let reserved_availability = total_availability + hfr.unwrap_or(0.0);

    ReportRow {
        part_number: part.part_number.clone(),
        on_hand: part.on_hand,
        backlog: bl,
        released,
        held_for_release: hfr,
        on_order: part.on_order,
        total_availability,
        reserved_availability,
        reorder: part.reorder,
        schedule: schedule.get(key).map(<[f64]>::to_vec),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::DateAxis;

    fn part(pn: &str, on_hand: f64, on_order: f64, reorder: f64) -> PartCatalogRow {
        PartCatalogRow {
            part_number: pn.to_string(),
            on_hand,
            on_order,
            reorder,
        }
    }

    fn quantities(entries: &[(&str, f64)]) -> QuantityMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn schedule(entries: &[(&str, &[f64])]) -> Schedule {
        let dates = DateAxis::new(vec!["01/06".to_string(), "01/13".to_string()]);
        let parts: BTreeMap<String, Vec<f64>> = entries.iter().map(|(k, v)| (k.to_string(), v.to_vec())).collect();
        Schedule::new(dates, parts).unwrap()
    }

    #[test]
    fn availability_fields_for_fully_enriched_part() {
        let report = compose_report(
            &[part("P1", 10.0, 5.0, 2.0)],
            &schedule(&[("P1", &[6.0, 10.0])]),
            &quantities(&[("P1", 4.0)]),
            &quantities(&[("P1", 1.0)]),
        );

        let row = &report.rows[0];
        assert_eq!(row.backlog, 4.0);
        assert_eq!(row.released, Some(3.0));
        assert_eq!(row.held_for_release, Some(1.0));
        assert_eq!(row.total_availability, 11.0);
        assert_eq!(row.reserved_availability, 12.0);
        assert_eq!(row.reorder, 2.0);
        assert_eq!(row.schedule, Some(vec![6.0, 10.0]));
    }

    #[test]
    fn released_stays_unset_without_hfr() {
        let report = compose_report(
            &[part("P1", 10.0, 0.0, 0.0)],
            &schedule(&[]),
            &quantities(&[("P1", 4.0)]),
            &quantities(&[]),
        );

        let row = &report.rows[0];
        assert_eq!(row.released, None);
        assert_eq!(row.held_for_release, None);
        assert_eq!(row.total_availability, 6.0);
        assert_eq!(row.reserved_availability, 6.0);
        assert_eq!(row.schedule, None);
    }

    #[test]
    fn hfr_without_backlog_releases_negative_amount() {
        let report = compose_report(&[part("P1", 0.0, 0.0, 0.0)], &schedule(&[]), &quantities(&[]), &quantities(&[("P1", 2.0)]));
        assert_eq!(report.rows[0].backlog, 0.0);
        assert_eq!(report.rows[0].released, Some(-2.0));
        assert_eq!(report.rows[0].reserved_availability, 2.0);
    }

    #[test]
    fn catalog_defines_the_universe_of_parts() {
        let report = compose_report(
            &[part("P2", 1.0, 1.0, 1.0), part("P1", 1.0, 1.0, 1.0)],
            &schedule(&[("GHOST", &[1.0, 1.0])]),
            &quantities(&[("GHOST", 9.0)]),
            &quantities(&[("GHOST", 9.0)]),
        );

        let parts: Vec<&str> = report.rows.iter().map(|r| r.part_number.as_str()).collect();
        assert_eq!(parts, vec!["P2", "P1"]);
        assert!(report.rows.iter().all(|r| r.backlog == 0.0 && r.schedule.is_none()));
    }

    #[test]
    fn header_carries_positional_date_columns() {
        let report = compose_report(&[], &schedule(&[]), &quantities(&[]), &quantities(&[]));
        let cols = report.header.columns();
        assert_eq!(&cols[cols.len() - 2..], ["01/06-1", "01/13-2"]);
        assert!(report.rows.is_empty());
    }
}
