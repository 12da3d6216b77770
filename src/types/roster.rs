use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One roster row. The canonical name is derived at construction and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterStudent {
    unique_id: String,
    canonical_name: String,
    pass_threshold_percent: f64,
}

impl RosterStudent {
    pub fn new(
        unique_id: impl Into<String>,
        first_name: &str,
        last_name: &str,
        pass_threshold_percent: f64,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            canonical_name: crate::engine::canonical::canonical_name(first_name, last_name),
            pass_threshold_percent,
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn pass_threshold_percent(&self) -> f64 {
        self.pass_threshold_percent
    }
}

/// Raw counts for one scraped name on one activity, as the collector emits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
    pub completed: u32,
    pub incorrect: u32,
    pub total: u32,
    pub name: String,
    #[serde(default)]
    pub block: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDate>,
}

/// One activity's results keyed by scraped display name, in the order the collector wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityBatch {
    entries: Vec<(String, RawResult)>,
}

impl ActivityBatch {
    pub fn get(&self, scraped_name: &str) -> Option<&RawResult> {
        self.entries
            .iter()
            .find(|(name, _)| name == scraped_name)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawResult)> {
        self.entries
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }

    /// Inserts or replaces. A replaced entry keeps its position.
    fn insert(&mut self, scraped_name: String, result: RawResult) {
        match self.entries.iter_mut().find(|(name, _)| *name == scraped_name) {
            Some((_, slot)) => *slot = result,
            None => self.entries.push((scraped_name, result)),
        }
    }
}

impl FromIterator<(String, RawResult)> for ActivityBatch {
    fn from_iter<I: IntoIterator<Item = (String, RawResult)>>(iter: I) -> Self {
        let mut batch = Self::default();
        for (scraped_name, result) in iter {
            batch.insert(scraped_name, result);
        }
        batch
    }
}

impl<'de> Deserialize<'de> for ActivityBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BatchVisitor;

        impl<'de> Visitor<'de> for BatchVisitor {
            type Value = ActivityBatch;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping scraped names to activity results")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut batch = ActivityBatch::default();
                while let Some((scraped_name, result)) = access.next_entry::<String, RawResult>()? {
                    batch.insert(scraped_name, result);
                }
                Ok(batch)
            }
        }

        deserializer.deserialize_map(BatchVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityResult {
    pub scraped_name: String,
    pub activity_label: String,
    pub completed_count: u32,
    pub incorrect_count: u32,
    pub total_count: u32,
    pub block: String,
}

impl ActivityResult {
    pub fn from_raw(scraped_name: &str, raw: &RawResult) -> Self {
        Self {
            scraped_name: scraped_name.to_string(),
            activity_label: raw.name.clone(),
            completed_count: raw.completed,
            incorrect_count: raw.incorrect,
            total_count: raw.total,
            block: raw.block.clone(),
        }
    }
}
