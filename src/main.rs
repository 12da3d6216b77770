mod cli;
mod config;
mod engine;
mod error;
mod generator;
mod load;
mod report;
mod telemetry;
mod types;

use crate::engine::{EngineSettings, Reconciliation};
use crate::error::RosterError;
use crate::types::config::RosterMatchConfig;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const CONFLICT: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn run() -> Result<i32, RosterError> {
    let cli = cli::Cli::parse();
    telemetry::init(cli.verbose, cli.quiet);

    let loaded = config::load_config(&cli.root)?;
    if loaded.is_none() {
        debug!(
            root = %cli.root.display(),
            "no {} found; using defaults",
            config::DEFAULT_CONFIG_FILE
        );
    }
    let cfg = loaded.unwrap_or_default();
    let settings = EngineSettings::from(&cfg);

    match cli.command {
        cli::Commands::Score(cmd) => {
            let roster = load::load_roster(&cmd.roster, &cfg.roster_columns())?;
            let batches = load::load_batches(&cmd.results, cmd.since)?;
            info!(
                students = roster.len(),
                batches = batches.len(),
                "inputs loaded"
            );

            let score_report = match engine::reconcile(&roster, &batches, &settings)? {
                Reconciliation::NothingToDo => {
                    println!("No activities to score; no report written.");
                    return Ok(exit_code::SUCCESS);
                }
                Reconciliation::Report(score_report) => score_report,
            };

            let output = cfg.output();
            let format = match cmd.format {
                cli::ReportFormat::Csv => report::OutputFormat::Csv,
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };
            let rendered = report::render(&score_report, format, &output)?;
            let destination = resolve_destination(&cli.root, cmd.out, format, &cfg);

            match &destination {
                Some(path) => {
                    generator::writer::write_report(path, &rendered)?;
                    println!("Scores written to: {}", path.display());
                }
                None => print!("{rendered}"),
            }

            if cmd.manifest {
                let generated_at = Utc::now();
                let manifest = generator::manifest::RunManifest::new(
                    &cmd.roster,
                    &cmd.results,
                    destination.as_deref(),
                    &score_report,
                    generated_at,
                )?;
                let path = generator::manifest::write_manifest(&cli.root, &manifest, generated_at)?;
                eprintln!("run manifest: {}", path.display());
            }

            if score_report.diagnostics.is_empty() {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::WARNINGS)
            }
        }
        cli::Commands::Match(cmd) => {
            let roster = load::load_roster(&cmd.roster, &cfg.roster_columns())?;
            let batches = load::load_batches(&cmd.results, cmd.since)?;
            let outcome = engine::preview_matches(&roster, &batches, &settings)?;

            println!("matches:");
            for pair in outcome.name_match.pairs() {
                println!(
                    "- {} <- {} (similarity {:.2}, tier {:.1})",
                    pair.roster_name, pair.scraped_name, pair.similarity, pair.tier
                );
            }
            if !outcome.unmatched_students.is_empty() {
                println!("unmatched students:");
                for student in &outcome.unmatched_students {
                    println!("- {} ({})", student.canonical_name(), student.unique_id());
                }
            }
            if !outcome.unmatched_names.is_empty() {
                println!("unmatched activity names:");
                for name in &outcome.unmatched_names {
                    println!("- {name}");
                }
            }

            if outcome.unmatched_students.is_empty() && outcome.unmatched_names.is_empty() {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::WARNINGS)
            }
        }
        cli::Commands::Check(cmd) => {
            let roster = load::load_roster(&cmd.roster, &cfg.roster_columns())?;
            println!("roster: {} students", roster.len());

            let Some(results) = cmd.results else {
                return Ok(exit_code::SUCCESS);
            };
            let batches = load::load_batches(&results, None)?;
            let record = engine::consolidate::consolidate(&batches);
            if batches.is_empty() || record.is_empty() {
                println!("results: no activities (nothing to score)");
                return Ok(exit_code::WARNINGS);
            }
            println!(
                "results: {} activities, {} scraped names",
                batches.len(),
                record.len()
            );
            Ok(exit_code::SUCCESS)
        }
    }
}

fn resolve_destination(
    root: &std::path::Path,
    out: Option<PathBuf>,
    format: report::OutputFormat,
    cfg: &RosterMatchConfig,
) -> Option<PathBuf> {
    match (out, format) {
        (Some(path), _) => Some(path),
        (None, report::OutputFormat::Csv) => Some(root.join(cfg.output().path)),
        (None, _) => None,
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e @ RosterError::MatchConflict { .. }) => {
            eprintln!("error: {}", e);
            eprintln!("no report written");
            std::process::exit(exit_code::CONFLICT);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
