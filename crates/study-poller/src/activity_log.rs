//! Append-only log of every listing fetched.
//!
//! The file is opened and closed for each entry; no handle is held between
//! cycles.

use crate::effects::LogEntry;
use crate::error::EffectError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LogEntry) -> Result<(), EffectError> {
        let to_error = |source| EffectError::Log {
            path: self.path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_error)?;
        file.write_all(entry.render().as_bytes()).map_err(to_error)?;

        tracing::info!("Saved listing to {}", self.path().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use serde_json::json;
    use shared_types::StudyListing;

    fn entry(h: u32, m: u32, s: u32, listing: StudyListing) -> LogEntry {
        let at = NaiveTime::from_hms_opt(h, m, s).expect("valid time");
        LogEntry::new(at, &listing)
    }

    #[test]
    fn test_append_creates_file_and_accumulates() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let log = ActivityLog::new(dir.path().join("prolific.log"));

        log.append(&entry(9, 0, 1, StudyListing::new(vec![json!({"id": "A"})])))
            .expect("first append");
        log.append(&entry(9, 0, 16, StudyListing::empty()))
            .expect("second append");

        let content = std::fs::read_to_string(log.path()).expect("should read log");
        assert_eq!(content, "09:00:01\n[{\"id\":\"A\"}]\n\n09:00:16\n[]\n\n");
    }

    #[test]
    fn test_append_to_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let log = ActivityLog::new(dir.path().join("missing").join("prolific.log"));

        let result = log.append(&entry(9, 0, 1, StudyListing::empty()));
        assert!(matches!(result, Err(EffectError::Log { .. })));
    }
}
