use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("malformed input: {0}")]
    DataShape(String),

    #[error(
        "match conflict: scraped name '{scraped}' claimed by '{claimant}' but already assigned to '{holder}'"
    )]
    MatchConflict {
        scraped: String,
        claimant: String,
        holder: String,
    },

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RosterError>;
