//! Run statistics
//!
//! A [`RunReport`] is created at the start of a run, filled in by the
//! exporter and read once at the end.

use crate::store::{AlbumId, PhotoId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// A photo whose file did not make it into the export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedPhoto {
    pub photo_id: PhotoId,
    pub album_id: AlbumId,
    pub reason: String,
}

/// Counters for one export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub albums_visited: usize,
    pub photos_transferred: usize,
    pub photos_failed: usize,
    /// Details for every counted failure, for a targeted retry
    pub failures: Vec<FailedPhoto>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Set once the whole tree has been exported
    #[serde(default)]
    pub completed: bool,
    /// Cause of the fatal error that ended the run early
    #[serde(default)]
    pub aborted_by: Option<String>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            albums_visited: 0,
            photos_transferred: 0,
            photos_failed: 0,
            failures: Vec::new(),
            started_at: Utc::now(),
            duration_ms: 0,
            completed: false,
            aborted_by: None,
        }
    }

    pub fn record_album(&mut self) {
        self.albums_visited += 1;
    }

    pub fn record_transferred(&mut self) {
        self.photos_transferred += 1;
    }

    pub fn record_failed(&mut self, photo_id: PhotoId, album_id: AlbumId, reason: String) {
        self.photos_failed += 1;
        self.failures.push(FailedPhoto {
            photo_id,
            album_id,
            reason,
        });
    }

    /// Stamp the elapsed time
    pub fn finalize(&mut self, elapsed: Duration) {
        self.duration_ms = elapsed.as_millis() as u64;
    }

    /// Mark the run as having exported the whole tree
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.aborted_by = None;
    }

    /// Mark the run as ended by a fatal error
    pub fn mark_aborted(&mut self, cause: impl Into<String>) {
        self.completed = false;
        self.aborted_by = Some(cause.into());
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted_by.is_some()
    }

    pub fn has_failures(&self) -> bool {
        self.photos_failed > 0
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref cause) = self.aborted_by {
            writeln!(f, "Export ABORTED: {}", cause)?;
        }
        writeln!(f, "Total Albums Exported: {}", self.albums_visited)?;
        writeln!(f, "Total Photos Exported: {}", self.photos_transferred)?;
        write!(f, "Failed Photos: {}", self.photos_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_counters() {
        let mut report = RunReport::new();
        report.record_album();
        report.record_album();
        report.record_transferred();
        report.record_failed(
            PhotoId::new("p2"),
            AlbumId::new("a1"),
            "missing source".to_string(),
        );

        assert_eq!(report.albums_visited, 2);
        assert_eq!(report.photos_transferred, 1);
        assert_eq!(report.photos_failed, 1);
        assert!(report.has_failures());
        assert_eq!(report.failures[0].photo_id, PhotoId::new("p2"));
    }

    #[test]
    fn test_display_matches_summary_lines() {
        let mut report = RunReport::new();
        report.record_album();
        let text = report.to_string();
        assert!(text.contains("Total Albums Exported: 1"));
        assert!(text.contains("Total Photos Exported: 0"));
        assert!(text.contains("Failed Photos: 0"));
    }

    #[test]
    fn test_outcome_markers() {
        let mut report = RunReport::new();
        assert!(!report.completed);
        assert!(!report.is_aborted());

        report.mark_aborted("album 'a1' has no title");
        assert!(!report.completed);
        assert!(report.is_aborted());
        assert!(report
            .to_string()
            .starts_with("Export ABORTED: album 'a1' has no title"));

        report.mark_completed();
        assert!(report.completed);
        assert!(!report.to_string().contains("ABORTED"));
    }

    #[test]
    fn test_write_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.json");

        let mut report = RunReport::new();
        report.record_failed(PhotoId::new("p1"), AlbumId::new("a1"), "boom".to_string());
        report.finalize(Duration::from_millis(1500));
        report.write_json(&path).unwrap();

        let loaded: RunReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.photos_failed, 1);
        assert_eq!(loaded.duration_ms, 1500);
        assert_eq!(loaded.failures[0].reason, "boom");
        assert!(!loaded.completed);
        assert!(loaded.aborted_by.is_none());
    }
}
