use crate::error::{Result, RosterError};
use crate::types::config::OutputConfig;
use crate::types::report::ScoreReport;

/// One row per roster student; absent scores are left blank rather than written as zero.
pub fn to_csv(report: &ScoreReport, output: &OutputConfig) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![output.id_header.as_str(), output.name_header.as_str()];
    header.extend(report.titles.iter().map(String::as_str));
    writer.write_record(&header)?;

    for row in &report.rows {
        let mut record = vec![row.unique_id.clone(), row.name.clone()];
        record.extend(report.titles.iter().map(|title| {
            row.score_for(title)
                .map(|score| score.points().to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| RosterError::Io(err.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|err| RosterError::DataShape(format!("report is not valid utf-8: {err}")))
}
