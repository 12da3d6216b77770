use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rostermatch",
    version,
    about = "Reconcile a class roster with scraped activity results and score each student"
)]
pub struct Cli {
    /// Directory holding rostermatch.toml and run manifests
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match names, score every student and write the report
    Score(ScoreCommand),
    /// Show how roster names pair with scraped names without scoring
    Match(MatchCommand),
    /// Validate config and input files
    Check(CheckCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
    Md,
}

#[derive(Args)]
pub struct ScoreCommand {
    /// Roster CSV
    pub roster: PathBuf,
    /// Collected activity results (JSON)
    pub results: PathBuf,
    /// Report destination; csv defaults to output.path, other formats print to stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ReportFormat,
    /// Ignore activities due before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub since: Option<NaiveDate>,
    /// Write a run manifest under .rostermatch/runs
    #[arg(long)]
    pub manifest: bool,
}

#[derive(Args)]
pub struct MatchCommand {
    pub roster: PathBuf,
    pub results: PathBuf,
    #[arg(long, value_parser = parse_date)]
    pub since: Option<NaiveDate>,
}

#[derive(Args)]
pub struct CheckCommand {
    pub roster: PathBuf,
    pub results: Option<PathBuf>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
