pub mod results;
pub mod roster;

use crate::error::{Result, RosterError};
use crate::types::config::RosterColumns;
use crate::types::roster::{ActivityBatch, RosterStudent};
use chrono::NaiveDate;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn open(path: &Path) -> Result<BufReader<File>> {
    if !path.exists() {
        return Err(RosterError::PathNotFound(path.display().to_string()));
    }
    Ok(BufReader::new(File::open(path)?))
}

pub fn load_roster(path: &Path, columns: &RosterColumns) -> Result<Vec<RosterStudent>> {
    roster::parse_roster(open(path)?, columns)
}

pub fn load_batches(path: &Path, since: Option<NaiveDate>) -> Result<Vec<ActivityBatch>> {
    let batches = results::parse_batches(open(path)?)?;
    Ok(match since {
        Some(since) => results::take_since(batches, since),
        None => batches,
    })
}
