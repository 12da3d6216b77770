use crate::error::{Result, RosterError};
use crate::types::roster::ActivityBatch;
use chrono::NaiveDate;
use std::io::Read;
use tracing::debug;

/// Reads collector output: a JSON array of batches, most recent activity first.
pub fn parse_batches<R: Read>(reader: R) -> Result<Vec<ActivityBatch>> {
    let batches: Vec<ActivityBatch> = serde_json::from_reader(reader)?;
    for (position, batch) in batches.iter().enumerate() {
        for (scraped_name, result) in batch.iter() {
            if result.completed > result.total {
                return Err(RosterError::DataShape(format!(
                    "batch {position}: '{scraped_name}' on '{}' completed {} of {} questions",
                    result.name, result.completed, result.total
                )));
            }
            if result.name.trim().is_empty() {
                return Err(RosterError::DataShape(format!(
                    "batch {position}: '{scraped_name}' has an empty activity name"
                )));
            }
        }
    }
    Ok(batches)
}

/// Keeps batches up to the first one due before `since`, mirroring how the collector stops
/// paging once it reaches activities older than the boundary. Undated batches are kept.
pub fn take_since(batches: Vec<ActivityBatch>, since: NaiveDate) -> Vec<ActivityBatch> {
    let total = batches.len();
    let kept = batches
        .into_iter()
        .take_while(|batch| batch_due(batch).map_or(true, |due| due >= since))
        .collect::<Vec<_>>();
    debug!(
        %since,
        kept = kept.len(),
        dropped = total - kept.len(),
        "applied date boundary"
    );
    kept
}

fn batch_due(batch: &ActivityBatch) -> Option<NaiveDate> {
    batch.iter().find_map(|(_, result)| result.due)
}
