pub mod csv;
pub mod json;
pub mod md;

use crate::error::RosterError;
use crate::types::config::OutputConfig;
use crate::types::report::ScoreReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    Md,
}

pub fn render(
    report: &ScoreReport,
    format: OutputFormat,
    output: &OutputConfig,
) -> Result<String, RosterError> {
    match format {
        OutputFormat::Csv => csv::to_csv(report, output),
        OutputFormat::Json => json::to_json(report).map_err(RosterError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report, output)),
    }
}
