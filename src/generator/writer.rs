use crate::error::{Result, RosterError};
use std::fs;
use std::path::Path;

/// Writes a rendered report, creating parent directories as needed.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(RosterError::Io)?;
        }
    }
    fs::write(path, content).map_err(RosterError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_report_creates_missing_directories() {
        let tmp = TempDir::new().expect("temp dir should create");
        let path = tmp.path().join("out/term1/Scores.csv");
        write_report(&path, "Unique User ID,Name\n").expect("report should write");
        assert_eq!(
            fs::read_to_string(path).expect("report should read"),
            "Unique User ID,Name\n"
        );
    }

    #[test]
    fn write_report_overwrites_previous_run() {
        let tmp = TempDir::new().expect("temp dir should create");
        let path = tmp.path().join("Scores.csv");
        write_report(&path, "old").expect("first write");
        write_report(&path, "new").expect("second write");
        assert_eq!(fs::read_to_string(path).expect("report should read"), "new");
    }
}
