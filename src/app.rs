//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments into a `RunConfig`
//! - runs the requested steps
//! - prints summaries

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CommonArgs, OutputArgs, SourceArgs};
use crate::domain::constants::{DEFAULT_ENCODING, DEFAULT_REPORT, DEFAULT_TIMEOUT_SECS, DEFAULT_URL, URL_ENV};
use crate::domain::{RunConfig, SourceLocation};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `materials` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Prep(common) => {
            let config = run_config(&common, None, None);
            handle_prep(&config)
        }
        Command::Schedule(args) => {
            let config = run_config(&args.common, Some(&args.source), None);
            handle_schedule(&config)
        }
        Command::Report(args) => {
            let config = run_config(&args.common, None, Some(&args.output));
            handle_report(&config, args.output.top)
        }
        Command::Run(args) => {
            let config = run_config(&args.common, Some(&args.source), Some(&args.output));
            handle_prep(&config)?;
            handle_schedule(&config)?;
            handle_report(&config, args.output.top)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_prep(config: &RunConfig) -> Result<(), AppError> {
    let summary = pipeline::run_prep(config)?;
    println!(
        "Prepared: {} catalog parts ({} with factors) | {} validations | {} backlog | {} HFR",
        summary.catalog_parts, summary.translations, summary.validations, summary.backlog_parts, summary.hfr_parts
    );
    Ok(())
}

fn handle_schedule(config: &RunConfig) -> Result<(), AppError> {
    let out = pipeline::run_schedule(config)?;
    println!(
        "{}",
        crate::report::format_schedule_summary(&out.build.stats, &out.build.notices, out.elapsed)
    );
    Ok(())
}

fn handle_report(config: &RunConfig, top: usize) -> Result<(), AppError> {
    let report = pipeline::run_report(config)?;
    println!("{}", crate::report::format_report_summary(&report, top));
    Ok(())
}

/// Build the run configuration from whichever flag groups the command has.
pub fn run_config(common: &CommonArgs, source: Option<&SourceArgs>, output: Option<&OutputArgs>) -> RunConfig {
    let env_url = std::env::var(URL_ENV).ok().filter(|u| !u.trim().is_empty());

    let location = match source {
        Some(SourceArgs { html: Some(path), .. }) => SourceLocation::File(path.clone()),
        Some(SourceArgs { url: Some(url), .. }) => SourceLocation::Url(url.clone()),
        _ => SourceLocation::Url(env_url.unwrap_or_else(|| DEFAULT_URL.to_string())),
    };

    RunConfig {
        data_dir: common.data_dir.clone(),
        source: location,
        encoding: source.map_or_else(|| DEFAULT_ENCODING.to_string(), |s| s.encoding.clone()),
        timeout_secs: source.map_or(DEFAULT_TIMEOUT_SECS, |s| s.timeout),
        output: output.map_or_else(|| DEFAULT_REPORT.into(), |o| o.output.clone()),
        dump_grouped: source.and_then(|s| s.dump_grouped.clone()),
    }
}

/// Rewrite argv so `materials` defaults to `materials run`.
///
/// Rules:
/// - `materials`                      -> `materials run`
/// - `materials -d data ...`          -> `materials run -d data ...`
/// - `materials --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "prep" | "schedule" | "report" | "run");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}
