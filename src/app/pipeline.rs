//! Shared step logic behind the CLI commands.
//!
//! prep:     lookup CSVs -> lookup JSON artifacts
//! schedule: vendor page + validation/translation artifacts -> schedule artifacts
//! report:   catalog CSV + schedule/backlog/HFR artifacts -> report CSV

use std::time::{Duration, Instant};

use tracing::info;

use crate::data::{load_html, parse_first_table};
use crate::domain::constants::{
    BL_CSV, BL_JSON, DATA_CSV, DATES_JSON, HFR_CSV, HFR_JSON, SCHEDULE_JSON, TRANSLATE_JSON, VALIDATE_CSV,
    VALIDATE_JSON,
};
use crate::domain::{QuantityMap, RunConfig, TranslationMap, ValidationMap};
use crate::error::AppError;
use crate::io::{
    load_catalog, load_json, load_quantity_sheet, load_schedule, load_validation, save_json, save_schedule,
    write_grouped_csv, write_report_csv,
};
use crate::report::{Report, compose_report};
use crate::schedule::{ScheduleBuild, build_schedule};

/// Sizes of the lookup artifacts written by `prep`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepSummary {
    pub catalog_parts: usize,
    pub translations: usize,
    pub validations: usize,
    pub backlog_parts: usize,
    pub hfr_parts: usize,
}

/// Outputs of one schedule build.
#[derive(Debug, Clone)]
pub struct ScheduleOutput {
    pub build: ScheduleBuild,
    pub elapsed: Duration,
}

/// Convert the lookup CSVs into JSON artifacts.
pub fn run_prep(config: &RunConfig) -> Result<PrepSummary, AppError> {
    let catalog = load_catalog(&config.data_path(DATA_CSV))?;
    save_json(&config.data_path(TRANSLATE_JSON), &catalog.translation)?;

    let validation = load_validation(&config.data_path(VALIDATE_CSV))?;
    save_json(&config.data_path(VALIDATE_JSON), &validation)?;

    let backlog = load_quantity_sheet(&config.data_path(BL_CSV))?;
    save_json(&config.data_path(BL_JSON), &backlog)?;

    let hfr = load_quantity_sheet(&config.data_path(HFR_CSV))?;
    save_json(&config.data_path(HFR_JSON), &hfr)?;

    let summary = PrepSummary {
        catalog_parts: catalog.parts.len(),
        translations: catalog.translation.len(),
        validations: validation.len(),
        backlog_parts: backlog.len(),
        hfr_parts: hfr.len(),
    };
    info!(?summary, "lookup artifacts written");
    Ok(summary)
}

/// Fetch the vendor page, build the schedule, and persist it.
///
/// Nothing is written unless the whole build succeeds.
pub fn run_schedule(config: &RunConfig) -> Result<ScheduleOutput, AppError> {
    let validation: ValidationMap = load_json(&config.data_path(VALIDATE_JSON))?;
    let translation: TranslationMap = load_json(&config.data_path(TRANSLATE_JSON))?;

    let html = load_html(
        &config.source,
        Duration::from_secs(config.timeout_secs),
        &config.encoding,
    )?;

    let start = Instant::now();
    let build = build_from_html(&html, &validation, &translation)?;
    let elapsed = start.elapsed();

    save_schedule(
        &config.data_path(SCHEDULE_JSON),
        &config.data_path(DATES_JSON),
        &build.schedule,
    )?;
    if let Some(path) = &config.dump_grouped {
        write_grouped_csv(path, &build.grouped, build.schedule.dates())?;
    }

    info!(parts = build.stats.parts, dates = build.stats.dates, "schedule written");
    Ok(ScheduleOutput { build, elapsed })
}

/// Parse a schedule page and run the reconciliation on it.
pub fn build_from_html(
    html: &str,
    validation: &ValidationMap,
    translation: &TranslationMap,
) -> Result<ScheduleBuild, AppError> {
    let table = parse_first_table(html)?;
    Ok(build_schedule(&table, validation, translation)?)
}

/// Compose the report from the catalog and the saved artifacts, and write it.
pub fn run_report(config: &RunConfig) -> Result<Report, AppError> {
    let catalog = load_catalog(&config.data_path(DATA_CSV))?;
    let schedule = load_schedule(&config.data_path(SCHEDULE_JSON), &config.data_path(DATES_JSON))?;
    let backlog: QuantityMap = load_json(&config.data_path(BL_JSON))?;
    let hfr: QuantityMap = load_json(&config.data_path(HFR_JSON))?;

    let report = compose_report(&catalog.parts, &schedule, &backlog, &hfr);
    write_report_csv(&config.output, &report)?;

    info!(rows = report.rows.len(), output = %config.output.display(), "report written");
    Ok(report)
}
