use crate::engine::consolidate::ConsolidatedRecord;
use crate::engine::matching::NameMatch;
use crate::types::report::{Diagnostic, ScoreRow};
use crate::types::roster::{ActivityResult, RosterStudent};
use crate::types::scoring::Score;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Converts raw counts into credit. Equality with the pass threshold earns full credit.
pub fn score_result(result: &ActivityResult, pass_threshold_percent: f64) -> Score {
    if result.completed_count == 0 {
        return Score::NotStarted;
    }
    let completed = f64::from(result.completed_count) * 100.0;
    let required = pass_threshold_percent * f64::from(result.total_count);
    if completed < required {
        Score::Partial
    } else {
        Score::Full
    }
}

/// Activity titles in first-seen order.
#[derive(Debug, Default)]
struct TitleSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl TitleSet {
    fn insert(&mut self, title: &str) {
        if self.seen.insert(title.to_string()) {
            self.ordered.push(title.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

#[derive(Debug)]
pub struct ScoreSheet {
    pub titles: Vec<String>,
    pub rows: Vec<ScoreRow>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn score_roster(
    roster: &[RosterStudent],
    name_match: &NameMatch,
    record: &ConsolidatedRecord,
    incorrect_warning: u32,
) -> ScoreSheet {
    let mut titles = TitleSet::default();
    let mut rows = Vec::with_capacity(roster.len());
    let mut diagnostics = Vec::new();

    for student in roster {
        let mut scores = BTreeMap::new();
        let results = name_match
            .scraped_for(student.unique_id())
            .map(|scraped| record.results_for(scraped))
            .unwrap_or_default();

        for result in results {
            titles.insert(&result.activity_label);

            if result.incorrect_count >= incorrect_warning {
                warn!(
                    student = student.canonical_name(),
                    activity = result.activity_label.as_str(),
                    incorrect = result.incorrect_count,
                    "high incorrect count"
                );
                diagnostics.push(Diagnostic::HighIncorrect {
                    name: student.canonical_name().to_string(),
                    activity: result.activity_label.clone(),
                    block: result.block.clone(),
                    incorrect: result.incorrect_count,
                });
            }

            // Batches run newest first, so the last write is the oldest result.
            let score = score_result(result, student.pass_threshold_percent());
            if scores
                .insert(result.activity_label.clone(), score)
                .is_some()
            {
                warn!(
                    student = student.canonical_name(),
                    activity = result.activity_label.as_str(),
                    "duplicate activity label; keeping oldest result"
                );
                diagnostics.push(Diagnostic::LabelCollision {
                    name: student.canonical_name().to_string(),
                    activity: result.activity_label.clone(),
                });
            }
        }

        rows.push(ScoreRow {
            unique_id: student.unique_id().to_string(),
            name: student.canonical_name().to_string(),
            scores,
        });
    }

    ScoreSheet {
        titles: titles.into_vec(),
        rows,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::consolidate::consolidate;
    use crate::types::roster::{ActivityBatch, RawResult};

    fn result(completed: u32, incorrect: u32, total: u32) -> ActivityResult {
        ActivityResult {
            scraped_name: "John Smith".to_string(),
            activity_label: "Quiz1".to_string(),
            completed_count: completed,
            incorrect_count: incorrect,
            total_count: total,
            block: "P2".to_string(),
        }
    }

    fn raw(label: &str, completed: u32, incorrect: u32, total: u32) -> RawResult {
        RawResult {
            completed,
            incorrect,
            total,
            name: label.to_string(),
            block: "P2".to_string(),
            due: None,
        }
    }

    #[test]
    fn zero_completed_scores_zero_regardless_of_total() {
        assert_eq!(score_result(&result(0, 0, 10), 80.0), Score::NotStarted);
        assert_eq!(score_result(&result(0, 0, 0), 0.0), Score::NotStarted);
    }

    #[test]
    fn below_threshold_scores_partial() {
        assert_eq!(score_result(&result(7, 0, 10), 80.0), Score::Partial);
        assert_eq!(score_result(&result(1, 0, 3), 50.0), Score::Partial);
    }

    #[test]
    fn exact_threshold_scores_full() {
        assert_eq!(score_result(&result(8, 1, 10), 80.0), Score::Full);
        assert_eq!(score_result(&result(7, 0, 10), 70.0), Score::Full);
        assert_eq!(score_result(&result(1, 0, 3), 100.0 / 3.0), Score::Full);
    }

    #[test]
    fn above_threshold_scores_full() {
        assert_eq!(score_result(&result(10, 0, 10), 80.0), Score::Full);
        assert_eq!(score_result(&result(1, 0, 10), 0.0), Score::Full);
    }

    #[test]
    fn scores_serialize_as_points() {
        let json = serde_json::to_string(&[Score::NotStarted, Score::Partial, Score::Full])
            .expect("scores should serialize");
        assert_eq!(json, "[0,1,2]");
    }

    #[test]
    fn score_roster_builds_rows_titles_and_warnings() {
        let roster = vec![
            RosterStudent::new("u-1", "John", "Smith", 80.0),
            RosterStudent::new("u-2", "Jane", "Doe", 50.0),
        ];
        let batches: Vec<ActivityBatch> = vec![
            [
                ("J. Smith".to_string(), raw("Quiz2", 3, 5, 10)),
                ("Orphan".to_string(), raw("Orphan Quiz", 5, 0, 10)),
            ]
            .into_iter()
            .collect(),
            [("J. Smith".to_string(), raw("Quiz1", 8, 1, 10))]
                .into_iter()
                .collect(),
        ];
        let record = consolidate(&batches);
        let mut name_match = NameMatch::default();
        name_match
            .claim(&roster[0], "J. Smith", 0.53, 0.5)
            .expect("claim should succeed");

        let sheet = score_roster(&roster, &name_match, &record, 4);
        assert_eq!(sheet.titles, vec!["Quiz2".to_string(), "Quiz1".to_string()]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].score_for("Quiz2"), Some(Score::Partial));
        assert_eq!(sheet.rows[0].score_for("Quiz1"), Some(Score::Full));
        assert!(sheet.rows[1].scores.is_empty());
        assert_eq!(sheet.rows[1].name, "Doe, Jane");
        assert_eq!(
            sheet.diagnostics,
            vec![Diagnostic::HighIncorrect {
                name: "Smith, John".to_string(),
                activity: "Quiz2".to_string(),
                block: "P2".to_string(),
                incorrect: 5,
            }]
        );
    }

    fn john_smith_with(batches: &[ActivityBatch]) -> ScoreSheet {
        let roster = vec![RosterStudent::new("u-1", "John", "Smith", 80.0)];
        let record = consolidate(batches);
        let mut name_match = NameMatch::default();
        name_match
            .claim(&roster[0], "John Smith", 0.82, 0.7)
            .expect("claim should succeed");
        score_roster(&roster, &name_match, &record, 4)
    }

    #[test]
    fn duplicate_label_keeps_oldest_score() {
        let batches: Vec<ActivityBatch> = vec![
            [("John Smith".to_string(), raw("Warmup", 10, 0, 10))]
                .into_iter()
                .collect(),
            [("John Smith".to_string(), raw("Warmup", 0, 0, 10))]
                .into_iter()
                .collect(),
        ];

        let sheet = john_smith_with(&batches);
        assert_eq!(sheet.titles, vec!["Warmup".to_string()]);
        assert_eq!(sheet.rows[0].score_for("Warmup"), Some(Score::NotStarted));
        assert!(matches!(
            sheet.diagnostics.as_slice(),
            [Diagnostic::LabelCollision { .. }]
        ));
    }

    #[test]
    fn duplicate_label_still_warns_on_high_incorrect() {
        let batches: Vec<ActivityBatch> = vec![
            [("John Smith".to_string(), raw("Warmup", 10, 0, 10))]
                .into_iter()
                .collect(),
            [("John Smith".to_string(), raw("Warmup", 6, 7, 10))]
                .into_iter()
                .collect(),
        ];

        let sheet = john_smith_with(&batches);
        assert_eq!(sheet.rows[0].score_for("Warmup"), Some(Score::Partial));
        assert_eq!(
            sheet.diagnostics,
            vec![
                Diagnostic::HighIncorrect {
                    name: "Smith, John".to_string(),
                    activity: "Warmup".to_string(),
                    block: "P2".to_string(),
                    incorrect: 7,
                },
                Diagnostic::LabelCollision {
                    name: "Smith, John".to_string(),
                    activity: "Warmup".to_string(),
                },
            ]
        );
    }
}
