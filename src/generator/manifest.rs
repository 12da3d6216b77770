use crate::error::{Result, RosterError};
use crate::types::report::{MatchedPair, ScoreReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const RUNS_DIR: &str = ".rostermatch/runs";

#[derive(Debug, Clone, Serialize)]
pub struct InputDigest {
    pub path: String,
    pub sha256: String,
}

/// Audit record for one scoring run: what went in, what was matched, where it was written.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub version: String,
    pub generated_at: String,
    pub roster: InputDigest,
    pub results: InputDigest,
    pub output: Option<String>,
    pub titles: Vec<String>,
    pub matches: Vec<MatchedPair>,
    pub diagnostics: Vec<String>,
}

impl RunManifest {
    pub fn new(
        roster_path: &Path,
        results_path: &Path,
        output: Option<&Path>,
        report: &ScoreReport,
        generated_at: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: generated_at.to_rfc3339(),
            roster: digest_file(roster_path)?,
            results: digest_file(results_path)?,
            output: output.map(|path| path.display().to_string()),
            titles: report.titles.clone(),
            matches: report.matches.clone(),
            diagnostics: report
                .diagnostics
                .iter()
                .map(|diagnostic| diagnostic.describe())
                .collect(),
        })
    }
}

fn digest_file(path: &Path) -> Result<InputDigest> {
    let bytes = fs::read(path).map_err(RosterError::Io)?;
    Ok(InputDigest {
        path: path.display().to_string(),
        sha256: sha256_hex(&bytes),
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

pub fn write_manifest(
    root: &Path,
    manifest: &RunManifest,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let dir = root.join(RUNS_DIR);
    fs::create_dir_all(&dir).map_err(RosterError::Io)?;
    let stamp = generated_at.format("%Y%m%dT%H%M%SZ");
    let out_path = dir.join(format!("run-{stamp}.json"));
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&out_path, json).map_err(RosterError::Io)?;
    Ok(out_path)
}
