use crate::types::roster::{ActivityBatch, ActivityResult};
use std::collections::HashMap;

/// Activity results grouped by scraped name. Names keep first-seen order and each name's
/// results keep batch order.
#[derive(Debug, Clone, Default)]
pub struct ConsolidatedRecord {
    names: Vec<String>,
    results: HashMap<String, Vec<ActivityResult>>,
}

impl ConsolidatedRecord {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn results_for(&self, scraped_name: &str) -> &[ActivityResult] {
        self.results
            .get(scraped_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn push(&mut self, result: ActivityResult) {
        match self.results.get_mut(&result.scraped_name) {
            Some(list) => list.push(result),
            None => {
                self.names.push(result.scraped_name.clone());
                self.results.insert(result.scraped_name.clone(), vec![result]);
            }
        }
    }
}

pub fn consolidate(batches: &[ActivityBatch]) -> ConsolidatedRecord {
    let mut record = ConsolidatedRecord::default();
    for batch in batches {
        for (scraped_name, raw) in batch.iter() {
            record.push(ActivityResult::from_raw(scraped_name, raw));
        }
    }
    record
}
