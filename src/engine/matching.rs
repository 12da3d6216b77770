use crate::engine::consolidate::ConsolidatedRecord;
use crate::engine::similarity::best_match;
use crate::error::{Result, RosterError};
use crate::types::config::{MatchPolicy, PoolRefresh};
use crate::types::report::MatchedPair;
use crate::types::roster::RosterStudent;
use std::collections::HashMap;
use tracing::debug;

/// One-to-one assignment between roster students and scraped names.
///
/// Both directions are indexed so a second claim on either side is rejected instead of
/// overwriting the first one.
#[derive(Debug, Clone, Default)]
pub struct NameMatch {
    pairs: Vec<MatchedPair>,
    by_student: HashMap<String, usize>,
    by_scraped: HashMap<String, usize>,
}

impl NameMatch {
    pub fn claim(
        &mut self,
        student: &RosterStudent,
        scraped_name: &str,
        similarity: f64,
        tier: f64,
    ) -> Result<()> {
        if let Some(&index) = self.by_scraped.get(scraped_name) {
            return Err(RosterError::MatchConflict {
                scraped: scraped_name.to_string(),
                claimant: student.canonical_name().to_string(),
                holder: self.pairs[index].roster_name.clone(),
            });
        }
        if let Some(&index) = self.by_student.get(student.unique_id()) {
            return Err(RosterError::MatchConflict {
                scraped: scraped_name.to_string(),
                claimant: student.canonical_name().to_string(),
                holder: format!(
                    "{} (student already holds '{}')",
                    self.pairs[index].roster_name, self.pairs[index].scraped_name
                ),
            });
        }

        let index = self.pairs.len();
        self.pairs.push(MatchedPair {
            unique_id: student.unique_id().to_string(),
            roster_name: student.canonical_name().to_string(),
            scraped_name: scraped_name.to_string(),
            similarity,
            tier,
        });
        self.by_student.insert(student.unique_id().to_string(), index);
        self.by_scraped.insert(scraped_name.to_string(), index);
        Ok(())
    }

    pub fn scraped_for(&self, unique_id: &str) -> Option<&str> {
        self.by_student
            .get(unique_id)
            .map(|&index| self.pairs[index].scraped_name.as_str())
    }

    pub fn is_claimed(&self, scraped_name: &str) -> bool {
        self.by_scraped.contains_key(scraped_name)
    }

    pub fn pairs(&self) -> &[MatchedPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

#[derive(Debug)]
pub struct MatchOutcome<'r> {
    pub name_match: NameMatch,
    pub unmatched_students: Vec<&'r RosterStudent>,
    pub unmatched_names: Vec<String>,
}

/// State handed from one tier to the next.
struct TierState<'r> {
    name_match: NameMatch,
    students: Vec<&'r RosterStudent>,
}

/// Aligns roster names with scraped names, strictest tier first.
///
/// A name claimed at a high threshold is unavailable to every later tier, so a weak match
/// can never take a name from a student who matches it more confidently.
pub fn match_names<'r>(
    roster: &'r [RosterStudent],
    record: &ConsolidatedRecord,
    policy: &MatchPolicy,
) -> Result<MatchOutcome<'r>> {
    let initial = TierState {
        name_match: NameMatch::default(),
        students: roster.iter().collect(),
    };

    let finished = policy
        .tiers
        .iter()
        .try_fold(initial, |state, &threshold| {
            run_tier(state, threshold, record, policy)
        })?;

    let unmatched_names = record
        .names()
        .iter()
        .filter(|name| !finished.name_match.is_claimed(name))
        .cloned()
        .collect();

    Ok(MatchOutcome {
        name_match: finished.name_match,
        unmatched_students: finished.students,
        unmatched_names,
    })
}

fn run_tier<'r>(
    state: TierState<'r>,
    threshold: f64,
    record: &ConsolidatedRecord,
    policy: &MatchPolicy,
) -> Result<TierState<'r>> {
    let TierState {
        mut name_match,
        students,
    } = state;

    let mut pool: Vec<&str> = record
        .names()
        .iter()
        .map(String::as_str)
        .filter(|name| !name_match.is_claimed(name))
        .collect();
    let mut carried = Vec::new();
    let matched_before = name_match.len();

    for student in students {
        let best = match best_match(student.canonical_name(), &pool, policy.tie_break) {
            Some(best) if best.score >= threshold => best,
            _ => {
                carried.push(student);
                continue;
            }
        };

        name_match.claim(student, best.target, best.score, threshold)?;
        debug!(
            tier = threshold,
            student = student.canonical_name(),
            scraped = best.target,
            similarity = best.score,
            "matched"
        );

        if policy.pool_refresh == PoolRefresh::PerMatch {
            pool.retain(|name| *name != best.target);
        }
    }

    debug!(
        tier = threshold,
        matched = name_match.len() - matched_before,
        remaining = carried.len(),
        "tier complete"
    );

    Ok(TierState {
        name_match,
        students: carried,
    })
}
