//! Command-line parsing for the materials availability tool.
//!
//! Argument parsing and command dispatch stay separate from the reconciliation
//! code; `app` turns these structs into a `RunConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::constants::{DEFAULT_ENCODING, DEFAULT_REPORT, DEFAULT_TIMEOUT_SECS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "materials", version, about = "Vendor schedule reconciliation and material availability report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert the catalog, validation, backlog and HFR CSVs into lookup artifacts.
    Prep(CommonArgs),
    /// Fetch the vendor schedule, validate and translate it, and save the schedule artifacts.
    Schedule(ScheduleArgs),
    /// Compose the availability report from the saved artifacts and the catalog.
    Report(ReportArgs),
    /// Run prep, schedule and report in order.
    Run(RunArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Directory holding the input CSVs and the JSON artifacts.
    #[arg(short = 'd', long, default_value = "data")]
    pub data_dir: PathBuf,
}

/// Where the schedule page comes from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Schedule page URL (defaults to $MATERIALS_URL, then the vendor page).
    #[arg(long, conflicts_with = "html")]
    pub url: Option<String>,

    /// Read the schedule page from a saved HTML file instead of fetching it.
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Text encoding of the page.
    #[arg(long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Fetch timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Also write the grouped vendor table (before validation) to this CSV.
    #[arg(long, value_name = "CSV")]
    pub dump_grouped: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Report CSV to write.
    #[arg(short = 'o', long, default_value = DEFAULT_REPORT)]
    pub output: PathBuf,

    /// Show at most this many parts below reorder in the summary.
    #[arg(long, default_value_t = 20)]
    pub top: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_all_flag_groups() {
        let cli = Cli::parse_from([
            "materials", "run", "-d", "in", "--html", "page.htm", "--encoding", "utf-8", "-o", "out.csv",
        ]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.common.data_dir, PathBuf::from("in"));
                assert_eq!(args.source.html, Some(PathBuf::from("page.htm")));
                assert_eq!(args.source.encoding, "utf-8");
                assert_eq!(args.source.timeout, DEFAULT_TIMEOUT_SECS);
                assert_eq!(args.output.output, PathBuf::from("out.csv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn url_and_html_conflict() {
        let res = Cli::try_parse_from(["materials", "schedule", "--url", "http://x", "--html", "p.htm"]);
        assert!(res.is_err());
    }
}
