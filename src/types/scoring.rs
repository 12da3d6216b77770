use serde::Serialize;

/// Categorical credit for one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum Score {
    NotStarted,
    Partial,
    Full,
}

impl Score {
    pub fn points(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::Partial => 1,
            Self::Full => 2,
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.points()
    }
}
