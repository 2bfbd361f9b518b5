use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use materials::app::pipeline::{build_from_html, run_schedule};
use materials::domain::constants::{DATES_JSON, IGNORE_ME, SCHEDULE_JSON, TRANSLATE_JSON, VALIDATE_JSON, VALIDATION_FAIL};
use materials::domain::{Notice, PartCatalogRow, QuantityMap, RunConfig, SourceLocation, TranslationMap, ValidationMap};
use materials::io::{read_catalog, read_quantity_sheet, read_validation, save_json, write_report};
use materials::report::compose_report;
use materials::schedule::build_schedule;

/// Vendor-shaped page: title rows, dates on row 3, data from row 5, metadata in columns 1..4.
fn page(data_rows: &[(&str, &str, &str)]) -> String {
    let mut html = String::from("<html><body><table>");
    html.push_str("<tr><td colspan=\"7\">Delivery schedule</td></tr>");
    html.push_str("<tr><td>2025-01-02</td><td></td><td></td><td></td><td></td><td></td><td></td></tr>");
    html.push_str("<tr><td></td><td></td><td></td><td></td><td></td><td></td><td></td></tr>");
    html.push_str("<tr><td>品番</td><td>a</td><td>b</td><td>c</td><td>d</td><td>2025-01-06</td><td>1/13</td></tr>");
    html.push_str("<tr><th>part</th><th>m1</th><th>m2</th><th>m3</th><th>m4</th><th>w1</th><th>w2</th></tr>");
    for (label, a, b) in data_rows {
        html.push_str(&format!(
            "<tr><td>{label}</td><td>x</td><td>x</td><td>x</td><td>x</td><td>{a}</td><td>{b}</td></tr>"
        ));
    }
    html.push_str("</table></body></html>");
    html
}

fn validation() -> ValidationMap {
    read_validation(format!("TOKI,TLI\nX1,P1\nX2,P1\nJUNK,{IGNORE_ME}\n").as_bytes()).unwrap()
}

fn translation(entries: &[(&str, f64)]) -> TranslationMap {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let dir = std::env::temp_dir().join(format!("materials_reconcile_{}_{}_{}", std::process::id(), nanos, name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Data dir with the validation/translation artifacts and a saved page, as `prep` + `--html` would leave it.
fn schedule_config(dir: &Path, html: &str, factors: &[(&str, f64)]) -> RunConfig {
    save_json(&dir.join(VALIDATE_JSON), &validation()).unwrap();
    save_json(&dir.join(TRANSLATE_JSON), &translation(factors)).unwrap();
    let page_path = dir.join("schedule.htm");
    std::fs::write(&page_path, html).unwrap();

    RunConfig {
        data_dir: dir.to_path_buf(),
        source: SourceLocation::File(page_path),
        encoding: "utf-8".to_string(),
        timeout_secs: 5,
        output: dir.join("report.csv"),
        dump_grouped: None,
    }
}

#[test]
fn page_to_report() {
    let html = page(&[
        ("X1(注)", "3", "5"),
        ("P1", "1", "\u{3000}"),
        ("JUNK", "9", "9"),
        ("X2", "1", "1"),
    ]);

    let build = build_from_html(&html, &validation(), &translation(&[("P1", 2.0)])).unwrap();
    let schedule = &build.schedule;
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule.get("P1"), Some(&[10.0, 12.0][..]));
    assert_eq!(schedule.dates().labels(), ["01/06/2025", "01/13"]);
    assert!(build.notices.iter().any(|n| matches!(n, Notice::IgnoredRow { key, .. } if key == "JUNK")));

    let catalog = read_catalog(
        "Part Number,Custom_Real_01,QtyRealTimeOnHand,QtyOnPurchaseOrder,Minimum_Stock_Level\n\
         P1,2,10,5,2\n\
         P9,1,0,0,3\n"
            .as_bytes(),
    )
    .unwrap();
    let backlog = read_quantity_sheet("PN,Qty,Factor\nP1,2,2\nGHOST,1,1\n".as_bytes()).unwrap();
    let hfr: QuantityMap = read_quantity_sheet("PN,Qty,Factor\nP1,1,1\n".as_bytes()).unwrap();

    let report = compose_report(&catalog.parts, schedule, &backlog, &hfr);
    assert_eq!(report.rows.len(), 2);

    let p1 = &report.rows[0];
    assert_eq!(p1.part_number, "P1");
    assert_eq!(p1.backlog, 4.0);
    assert_eq!(p1.released, Some(3.0));
    assert_eq!(p1.total_availability, 11.0);
    assert_eq!(p1.reserved_availability, 12.0);
    assert_eq!(p1.schedule, Some(vec![10.0, 12.0]));

    let p9 = &report.rows[1];
    assert_eq!(
        (p9.backlog, p9.released, p9.held_for_release, p9.schedule.clone()),
        (0.0, None, None, None)
    );
    assert!(report.rows.iter().all(|r| r.part_number != "GHOST"));

    let mut buf = Vec::new();
    write_report(&mut buf, &report).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "Part Number,On Hand,Backlog,Released,HFR,On Order,T-Avail,R-Avail,Reorder,01/06/2025-1,01/13-2",
            "P1,10,4,3,1,5,11,12,2,10,12",
            "P9,0,0,,,0,0,0,3,,",
        ]
    );

    let expected_parts = vec![PartCatalogRow {
        part_number: "P1".to_string(),
        on_hand: 10.0,
        on_order: 5.0,
        reorder: 2.0,
    }];
    assert_eq!(catalog.parts[..1], expected_parts[..]);
}

#[test]
fn missing_translations_are_reported_together() {
    let html = page(&[("P1", "1", "1"), ("P2", "1", "1"), ("P3", "1", "1"), ("JUNK", "1", "1")]);

    let err = build_from_html(&html, &validation(), &translation(&[("P1", 1.0)])).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.message().starts_with("2 schedule key(s)"));
    assert!(err.message().ends_with(VALIDATION_FAIL));

    let table = materials::data::parse_first_table(&html).unwrap();
    match build_schedule(&table, &validation(), &translation(&[("P1", 1.0)])).unwrap_err() {
        materials::error::ScheduleError::TranslationCoverage { misses } => {
            let keys: Vec<&str> = misses.iter().map(|m| m.key.as_str()).collect();
            assert_eq!(keys, ["P2", "P3"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn coverage_failure_writes_no_schedule() {
    let dir = tmp_dir("coverage");
    let html = page(&[("P1", "1", "1"), ("P2", "1", "1")]);
    let config = schedule_config(&dir, &html, &[("P1", 1.0)]);

    let err = run_schedule(&config).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(!dir.join(SCHEDULE_JSON).exists());
    assert!(!dir.join(DATES_JSON).exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn covered_page_writes_both_schedule_artifacts() {
    let dir = tmp_dir("covered");
    let html = page(&[("P1", "1", "2"), ("X1", "3", "4")]);
    let config = schedule_config(&dir, &html, &[("P1", 10.0)]);

    let out = run_schedule(&config).unwrap();
    assert_eq!(out.build.schedule.get("P1"), Some(&[40.0, 60.0][..]));
    assert!(dir.join(SCHEDULE_JSON).exists());
    assert!(dir.join(DATES_JSON).exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn short_table_is_a_shape_error() {
    let html = "<table><tr><td>only</td></tr></table>";
    let err = build_from_html(html, &validation(), &translation(&[])).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}
