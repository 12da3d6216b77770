use crate::error::{Result, RosterError};
use crate::types::config::RosterColumns;
use crate::types::roster::RosterStudent;
use std::collections::HashSet;
use std::io::Read;

const BOM: char = '\u{feff}';

struct ColumnIndex {
    id: usize,
    first_name: usize,
    last_name: usize,
    threshold: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, columns: &RosterColumns) -> Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|header| header.trim_start_matches(BOM).trim() == wanted)
                .ok_or_else(|| {
                    RosterError::DataShape(format!("roster is missing required column '{wanted}'"))
                })
        };
        Ok(Self {
            id: find(columns.id_column.as_str())?,
            first_name: find(columns.first_name_column.as_str())?,
            last_name: find(columns.last_name_column.as_str())?,
            threshold: find(columns.threshold_column.as_str())?,
        })
    }
}

/// Parses a roster CSV. Name fields are kept verbatim; every row must carry a non-empty,
/// unique id and a pass threshold between 0 and 100.
pub fn parse_roster<R: Read>(reader: R, columns: &RosterColumns) -> Result<Vec<RosterStudent>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, columns)?;

    let mut students = Vec::new();
    let mut seen_ids = HashSet::new();
    for (offset, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = offset + 2;
        let field = |position: usize, column: &str| {
            record.get(position).ok_or_else(|| {
                RosterError::DataShape(format!("roster line {line}: missing value for '{column}'"))
            })
        };

        let unique_id = field(index.id, columns.id_column.as_str())?.trim();
        if unique_id.is_empty() {
            return Err(RosterError::DataShape(format!(
                "roster line {line}: '{}' is empty",
                columns.id_column
            )));
        }
        if !seen_ids.insert(unique_id.to_string()) {
            return Err(RosterError::DataShape(format!(
                "roster line {line}: duplicate id '{unique_id}'"
            )));
        }

        let first_name = field(index.first_name, columns.first_name_column.as_str())?;
        let last_name = field(index.last_name, columns.last_name_column.as_str())?;
        let threshold =
            parse_threshold(field(index.threshold, columns.threshold_column.as_str())?).map_err(
                |reason| {
                    RosterError::DataShape(format!(
                        "roster line {line}: '{}' {reason}",
                        columns.threshold_column
                    ))
                },
            )?;

        students.push(RosterStudent::new(
            unique_id, first_name, last_name, threshold,
        ));
    }

    Ok(students)
}

fn parse_threshold(raw: &str) -> std::result::Result<f64, String> {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| format!("is not a number: '{raw}'"))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("must be between 0 and 100 (found {value})"));
    }
    Ok(value)
}
