//! Per-file and per-run records.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::cache::CacheEntry;
use crate::geometry::PathFindings;
use crate::svg::CleanupStats;

/// A batch member, captured before any tool touches it.
#[derive(Debug)]
pub struct FileRecord {
    pub path: PathBuf,
    pub original_size: u64,
    pub start: Instant,
}

impl FileRecord {
    /// `None` when the file is gone or not a regular file.
    pub fn capture(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok().filter(fs::Metadata::is_file)?;
        Some(Self {
            path: path.to_path_buf(),
            original_size: meta.len(),
            start: Instant::now(),
        })
    }

    /// Close the record after cleanup, measuring the file as it is now.
    pub fn finish(self, stats: Option<CleanupStats>) -> FileResult {
        let optimized_size = fs::metadata(&self.path).map_or(0, |m| m.len());
        FileResult {
            elapsed: self.start.elapsed().as_secs_f64(),
            path: self.path,
            original_size: self.original_size,
            optimized_size,
            stats,
            cached: false,
        }
    }
}

/// Outcome for one file, fresh or from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub path: PathBuf,
    pub original_size: u64,
    pub optimized_size: u64,
    /// Seconds.
    pub elapsed: f64,
    pub stats: Option<CleanupStats>,
    pub cached: bool,
}

impl FileResult {
    pub fn from_cache(path: &Path, entry: &CacheEntry) -> Self {
        Self {
            path: path.to_path_buf(),
            original_size: entry.original_size,
            optimized_size: entry.new_size,
            elapsed: entry.elapsed,
            stats: entry.stats,
            cached: true,
        }
    }

    /// Bytes saved; never negative.
    pub fn saved(&self) -> u64 {
        self.original_size.saturating_sub(self.optimized_size)
    }

    pub fn percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = self.saved() as f64 / self.original_size as f64 * 100.0;
        pct
    }
}

/// Findings for one file of the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDiagnostics {
    pub path: PathBuf,
    pub findings: Vec<PathFindings>,
}

/// Stage whose failure aborted a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageFailure {
    GeometryHealing,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeometryHealing => f.write_str("geometry healing (vpype)"),
        }
    }
}

/// Summary of one pipeline execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    /// Unix seconds.
    pub timestamp: u64,
    pub trigger: String,
    pub file_count: usize,
    pub bytes_saved: u64,
    pub irregularity_count: usize,
    pub success: bool,
}

impl RunRecord {
    pub fn now(trigger: impl Into<String>) -> Self {
        Self {
            timestamp: unix_now(),
            trigger: trigger.into(),
            file_count: 0,
            bytes_saved: 0,
            irregularity_count: 0,
            success: true,
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Everything one orchestrator run produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Ordered by path.
    pub results: Vec<FileResult>,
    pub diagnostics: Vec<FileDiagnostics>,
    /// Misses that did not make it into `results`.
    pub failed: Vec<PathBuf>,
    pub stage_failure: Option<StageFailure>,
    pub record: RunRecord,
}

impl BatchReport {
    /// The batch ended with every file accounted for.
    pub fn is_success(&self) -> bool {
        self.stage_failure.is_none() && self.failed.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.results.iter().filter(|r| r.cached).count()
    }

    pub fn total_saved(&self) -> u64 {
        self.results.iter().map(FileResult::saved).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn result(orig: u64, new: u64) -> FileResult {
        FileResult {
            path: PathBuf::from("a.svg"),
            original_size: orig,
            optimized_size: new,
            elapsed: 0.1,
            stats: None,
            cached: false,
        }
    }

    #[test]
    fn test_saved_and_percent() {
        let r = result(1000, 250);
        assert_eq!(r.saved(), 750);
        assert!((r.percent() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_growth_saves_nothing() {
        let r = result(100, 120);
        assert_eq!(r.saved(), 0);
        assert_eq!(r.percent(), 0.0);
    }

    #[test]
    fn test_empty_original() {
        assert_eq!(result(0, 0).percent(), 0.0);
    }

    #[test]
    fn test_capture_and_finish() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.svg");
        fs::write(&path, "0123456789").unwrap();

        let record = FileRecord::capture(&path).unwrap();
        assert_eq!(record.original_size, 10);

        fs::write(&path, "0123").unwrap();
        let result = record.finish(Some(CleanupStats::default()));
        assert_eq!(result.optimized_size, 4);
        assert_eq!(result.saved(), 6);
        assert!(!result.cached);
    }

    #[test]
    fn test_capture_missing_or_directory() {
        let dir = TempDir::new().unwrap();
        assert!(FileRecord::capture(&dir.path().join("gone.svg")).is_none());
        assert!(FileRecord::capture(dir.path()).is_none());
    }

    #[test]
    fn test_report_totals() {
        let mut cached = result(400, 100);
        cached.cached = true;
        let report = BatchReport {
            results: vec![result(1000, 250), cached],
            diagnostics: Vec::new(),
            failed: Vec::new(),
            stage_failure: None,
            record: RunRecord::now("test"),
        };
        assert_eq!(report.hits(), 1);
        assert_eq!(report.total_saved(), 1050);
        assert!(report.is_success());
    }
}
