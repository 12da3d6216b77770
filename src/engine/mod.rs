pub mod canonical;
pub mod consolidate;
pub mod matching;
pub mod scoring;
pub mod similarity;

use crate::error::Result;
use crate::types::config::{MatchPolicy, RosterMatchConfig};
use crate::types::report::{Diagnostic, ScoreReport};
use crate::types::roster::{ActivityBatch, RosterStudent};
use matching::MatchOutcome;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub policy: MatchPolicy,
    pub incorrect_warning: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::default(),
            incorrect_warning: RosterMatchConfig::DEFAULT_INCORRECT_WARNING,
        }
    }
}

impl From<&RosterMatchConfig> for EngineSettings {
    fn from(config: &RosterMatchConfig) -> Self {
        Self {
            policy: config.match_policy(),
            incorrect_warning: config.incorrect_warning(),
        }
    }
}

#[derive(Debug)]
pub enum Reconciliation {
    /// No activity batches were supplied; there is nothing to report.
    NothingToDo,
    Report(ScoreReport),
}

/// Runs consolidation, matching and scoring over fully loaded inputs.
pub fn reconcile(
    roster: &[RosterStudent],
    batches: &[ActivityBatch],
    settings: &EngineSettings,
) -> Result<Reconciliation> {
    if batches.is_empty() {
        info!("no activity batches supplied");
        return Ok(Reconciliation::NothingToDo);
    }

    let record = consolidate::consolidate(batches);
    info!(
        batches = batches.len(),
        scraped_names = record.len(),
        "consolidated activity results"
    );

    let outcome = matching::match_names(roster, &record, &settings.policy)?;
    info!(
        matched = outcome.name_match.len(),
        unmatched_students = outcome.unmatched_students.len(),
        unmatched_names = outcome.unmatched_names.len(),
        "matched roster names"
    );

    let mut diagnostics = unmatched_diagnostics(&outcome);
    let sheet = scoring::score_roster(
        roster,
        &outcome.name_match,
        &record,
        settings.incorrect_warning,
    );
    diagnostics.extend(sheet.diagnostics);

    Ok(Reconciliation::Report(ScoreReport {
        titles: sheet.titles,
        rows: sheet.rows,
        matches: outcome.name_match.pairs().to_vec(),
        diagnostics,
    }))
}

/// Matches only, for operator review before scoring.
pub fn preview_matches<'r>(
    roster: &'r [RosterStudent],
    batches: &[ActivityBatch],
    settings: &EngineSettings,
) -> Result<MatchOutcome<'r>> {
    let record = consolidate::consolidate(batches);
    matching::match_names(roster, &record, &settings.policy)
}

fn unmatched_diagnostics(outcome: &MatchOutcome<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for student in &outcome.unmatched_students {
        warn!(
            student = student.canonical_name(),
            id = student.unique_id(),
            "no scraped name matched roster student"
        );
        diagnostics.push(Diagnostic::UnmatchedStudent {
            unique_id: student.unique_id().to_string(),
            name: student.canonical_name().to_string(),
        });
    }
    if !outcome.unmatched_names.is_empty() {
        warn!(
            names = ?outcome.unmatched_names,
            "scraped names left unmatched; their results are dropped"
        );
    }
    for name in &outcome.unmatched_names {
        diagnostics.push(Diagnostic::UnmatchedActivityName {
            scraped_name: name.clone(),
        });
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::types::config::PoolRefresh;
    use crate::types::roster::RawResult;
    use crate::types::scoring::Score;
    use std::collections::BTreeSet;

    fn raw(label: &str, completed: u32, incorrect: u32, total: u32) -> RawResult {
        RawResult {
            completed,
            incorrect,
            total,
            name: label.to_string(),
            block: "P3".to_string(),
            due: None,
        }
    }

    fn batch(entries: Vec<(&str, RawResult)>) -> ActivityBatch {
        entries
            .into_iter()
            .map(|(name, result)| (name.to_string(), result))
            .collect()
    }

    fn report(reconciliation: Reconciliation) -> ScoreReport {
        match reconciliation {
            Reconciliation::Report(report) => report,
            Reconciliation::NothingToDo => panic!("expected a report"),
        }
    }

    #[test]
    fn empty_batches_mean_nothing_to_do() {
        let roster = vec![RosterStudent::new("u-1", "John", "Smith", 80.0)];
        let result = reconcile(&roster, &[], &EngineSettings::default()).expect("should succeed");
        assert!(matches!(result, Reconciliation::NothingToDo));
    }

    #[test]
    fn single_student_scenario_scores_full_credit_at_boundary() {
        let roster = vec![RosterStudent::new("u-1", "John", "Smith", 80.0)];
        let batches = vec![batch(vec![("J. Smith", raw("Quiz1", 8, 1, 10))])];

        let report = report(
            reconcile(&roster, &batches, &EngineSettings::default()).expect("should succeed"),
        );
        assert_eq!(report.titles, vec!["Quiz1".to_string()]);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].tier, 0.5);
        assert_eq!(report.rows[0].unique_id, "u-1");
        assert_eq!(report.rows[0].name, "Smith, John");
        assert_eq!(report.rows[0].score_for("Quiz1"), Some(Score::Full));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn columns_cover_exactly_the_matched_labels() {
        let roster = vec![
            RosterStudent::new("u-1", "Avery", "Lee", 80.0),
            RosterStudent::new("u-2", "Jules", "Moreno", 80.0),
        ];
        let batches = vec![
            batch(vec![
                ("Avery Lee", raw("Lab 3", 5, 0, 5)),
                ("Quinn X", raw("Lab 3", 2, 0, 5)),
            ]),
            batch(vec![
                ("Jules Moreno", raw("Lab 2", 1, 0, 5)),
                ("Quinn X", raw("Only Quinn", 5, 0, 5)),
            ]),
            batch(vec![("Avery Lee", raw("Lab 1", 0, 0, 5))]),
        ];

        let report = report(
            reconcile(&roster, &batches, &EngineSettings::default()).expect("should succeed"),
        );
        let columns = report.titles.iter().cloned().collect::<BTreeSet<_>>();
        let expected = ["Lab 1", "Lab 2", "Lab 3"]
            .iter()
            .map(|title| title.to_string())
            .collect::<BTreeSet<_>>();
        assert_eq!(columns, expected);
        assert_eq!(report.titles, vec!["Lab 3", "Lab 1", "Lab 2"]);
        assert_eq!(report.rows[0].score_for("Lab 1"), Some(Score::NotStarted));
        assert_eq!(report.rows[1].score_for("Lab 2"), Some(Score::Partial));
        assert_eq!(report.rows[1].score_for("Lab 3"), None);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnmatchedActivityName {
                scraped_name: "Quinn X".to_string()
            }]
        );
        assert_eq!(report.unmatched_name_count(), 1);
        assert_eq!(report.unmatched_student_count(), 0);
    }

    #[test]
    fn unmatched_student_gets_identity_only_row() {
        let roster = vec![
            RosterStudent::new("u-1", "John", "Smith", 80.0),
            RosterStudent::new("u-2", "Kiara", "Patel", 80.0),
        ];
        let batches = vec![batch(vec![("John Smith", raw("Quiz1", 10, 0, 10))])];

        let report = report(
            reconcile(&roster, &batches, &EngineSettings::default()).expect("should succeed"),
        );
        assert!(report.rows[1].scores.is_empty());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnmatchedStudent {
                unique_id: "u-2".to_string(),
                name: "Patel, Kiara".to_string(),
            }]
        );
    }

    #[test]
    fn conflict_aborts_without_report() {
        let roster = vec![
            RosterStudent::new("u-1", "John", "Smith", 80.0),
            RosterStudent::new("u-2", "Joan", "Smith", 80.0),
        ];
        let batches = vec![batch(vec![("Smith, Jo", raw("Quiz1", 10, 0, 10))])];
        let settings = EngineSettings {
            policy: MatchPolicy {
                pool_refresh: PoolRefresh::PerTier,
                ..MatchPolicy::default()
            },
            ..EngineSettings::default()
        };

        let result = reconcile(&roster, &batches, &settings);
        assert!(matches!(result, Err(RosterError::MatchConflict { .. })));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let roster = vec![
            RosterStudent::new("u-1", "John", "Smith", 80.0),
            RosterStudent::new("u-2", "Avery", "Lee", 60.0),
        ];
        let batches = vec![batch(vec![
            ("J. Smith", raw("Quiz1", 8, 4, 10)),
            ("Avery L.", raw("Quiz1", 5, 0, 10)),
        ])];
        let settings = EngineSettings::default();

        let first = report(reconcile(&roster, &batches, &settings).expect("first run"));
        let second = report(reconcile(&roster, &batches, &settings).expect("second run"));
        assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json")
        );
    }

    #[test]
    fn preview_matches_reports_unmatched_names() {
        let roster = vec![RosterStudent::new("u-1", "John", "Smith", 80.0)];
        let batches = vec![batch(vec![
            ("John Smith", raw("Quiz1", 1, 0, 1)),
            ("Zed", raw("Quiz1", 1, 0, 1)),
        ])];
        let outcome =
            preview_matches(&roster, &batches, &EngineSettings::default()).expect("preview");
        assert_eq!(outcome.name_match.scraped_for("u-1"), Some("John Smith"));
        assert_eq!(outcome.unmatched_names, vec!["Zed".to_string()]);
    }
}
