use crate::error::RosterError;
use serde::Deserialize;

pub const DEFAULT_TIERS: [f64; 5] = [0.9, 0.7, 0.5, 0.3, 0.1];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterMatchConfig {
    pub matching: Option<MatchingConfig>,
    pub scoring: Option<ScoringConfig>,
    pub roster: Option<RosterColumns>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Equal scores resolve to the lexicographically smallest candidate.
    #[default]
    Lexical,
    /// Equal scores resolve to the candidate discovered first.
    Discovery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolRefresh {
    #[default]
    PerMatch,
    PerTier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    pub tiers: Option<Vec<f64>>,
    pub tie_break: Option<TieBreak>,
    pub pool_refresh: Option<PoolRefresh>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub incorrect_warning: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterColumns {
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_first_name_column")]
    pub first_name_column: String,
    #[serde(default = "default_last_name_column")]
    pub last_name_column: String,
    #[serde(default = "default_threshold_column")]
    pub threshold_column: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            first_name_column: default_first_name_column(),
            last_name_column: default_last_name_column(),
            threshold_column: default_threshold_column(),
        }
    }
}

fn default_id_column() -> String {
    "Unique User ID".to_string()
}

fn default_first_name_column() -> String {
    "First Name".to_string()
}

fn default_last_name_column() -> String {
    "Last Name".to_string()
}

fn default_threshold_column() -> String {
    "2 pts".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_id_column")]
    pub id_header: String,
    #[serde(default = "default_name_header")]
    pub name_header: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            id_header: default_id_column(),
            name_header: default_name_header(),
        }
    }
}

fn default_output_path() -> String {
    "Scores.csv".to_string()
}

fn default_name_header() -> String {
    "Name".to_string()
}

/// Resolved matching knobs with every default filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPolicy {
    pub tiers: Vec<f64>,
    pub tie_break: TieBreak,
    pub pool_refresh: PoolRefresh,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIERS.to_vec(),
            tie_break: TieBreak::default(),
            pool_refresh: PoolRefresh::default(),
        }
    }
}

impl RosterMatchConfig {
    pub const DEFAULT_INCORRECT_WARNING: u32 = 4;

    pub fn match_policy(&self) -> MatchPolicy {
        let defaults = MatchPolicy::default();
        match &self.matching {
            Some(matching) => MatchPolicy {
                tiers: matching.tiers.clone().unwrap_or(defaults.tiers),
                tie_break: matching.tie_break.unwrap_or(defaults.tie_break),
                pool_refresh: matching.pool_refresh.unwrap_or(defaults.pool_refresh),
            },
            None => defaults,
        }
    }

    pub fn incorrect_warning(&self) -> u32 {
        self.scoring
            .as_ref()
            .and_then(|scoring| scoring.incorrect_warning)
            .unwrap_or(Self::DEFAULT_INCORRECT_WARNING)
    }

    pub fn roster_columns(&self) -> RosterColumns {
        self.roster.clone().unwrap_or_default()
    }

    pub fn output(&self) -> OutputConfig {
        self.output.clone().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        let tiers = self.match_policy().tiers;
        if tiers.is_empty() {
            return Err(RosterError::ConfigParse(
                "matching.tiers must contain at least one threshold".to_string(),
            ));
        }
        if let Some(tier) = tiers.iter().find(|tier| !(**tier > 0.0 && **tier <= 1.0)) {
            return Err(RosterError::ConfigParse(format!(
                "matching.tiers values must be in (0.0, 1.0] (found {tier})"
            )));
        }
        if tiers.windows(2).any(|pair| pair[1] >= pair[0]) {
            return Err(RosterError::ConfigParse(
                "matching.tiers must be strictly descending".to_string(),
            ));
        }

        if self.incorrect_warning() == 0 {
            return Err(RosterError::ConfigParse(
                "scoring.incorrect_warning must be greater than 0".to_string(),
            ));
        }

        let columns = self.roster_columns();
        for (key, value) in [
            ("roster.id_column", &columns.id_column),
            ("roster.first_name_column", &columns.first_name_column),
            ("roster.last_name_column", &columns.last_name_column),
            ("roster.threshold_column", &columns.threshold_column),
        ] {
            if value.trim().is_empty() {
                return Err(RosterError::ConfigParse(format!("{key} must be non-empty")));
            }
        }

        let output = self.output();
        if output.path.trim().is_empty() {
            return Err(RosterError::ConfigParse(
                "output.path must be non-empty".to_string(),
            ));
        }
        if output.id_header == output.name_header {
            return Err(RosterError::ConfigParse(
                "output.id_header and output.name_header must differ".to_string(),
            ));
        }

        Ok(())
    }
}
