use crate::types::scoring::Score;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRow {
    pub unique_id: String,
    pub name: String,
    pub scores: BTreeMap<String, Score>,
}

impl ScoreRow {
    pub fn score_for(&self, title: &str) -> Option<Score> {
        self.scores.get(title).copied()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchedPair {
    pub unique_id: String,
    pub roster_name: String,
    pub scraped_name: String,
    pub similarity: f64,
    pub tier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    UnmatchedStudent {
        unique_id: String,
        name: String,
    },
    UnmatchedActivityName {
        scraped_name: String,
    },
    HighIncorrect {
        name: String,
        activity: String,
        block: String,
        incorrect: u32,
    },
    LabelCollision {
        name: String,
        activity: String,
    },
}

impl Diagnostic {
    pub fn describe(&self) -> String {
        match self {
            Self::UnmatchedStudent { unique_id, name } => {
                format!("unmatched student: {name} ({unique_id})")
            }
            Self::UnmatchedActivityName { scraped_name } => {
                format!("unmatched activity name: {scraped_name}")
            }
            Self::HighIncorrect {
                name,
                activity,
                block,
                incorrect,
            } => {
                if block.is_empty() {
                    format!("{name} / {activity}: {incorrect} incorrect")
                } else {
                    format!("{name} / {activity} [{block}]: {incorrect} incorrect")
                }
            }
            Self::LabelCollision { name, activity } => {
                format!("{name} / {activity}: duplicate activity label, kept oldest")
            }
        }
    }
}

/// Final output of a reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub titles: Vec<String>,
    pub rows: Vec<ScoreRow>,
    pub matches: Vec<MatchedPair>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScoreReport {
    pub fn unmatched_student_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| matches!(diagnostic, Diagnostic::UnmatchedStudent { .. }))
            .count()
    }

    pub fn unmatched_name_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| matches!(diagnostic, Diagnostic::UnmatchedActivityName { .. }))
            .count()
    }
}
