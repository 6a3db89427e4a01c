//! Batch orchestration.
//!
//! ```text
//! files ─► partition ─┬─ hits ──────────────────────────────────────┐
//!                     └─ misses ─► vpype ─► svgo ─► cleanup (pool) ─┴─► store ─► diagnose ─► report
//! ```
//!
//! The external stages run once per batch. Only the in-process cleanup fans
//! out, on a pool that lives for that stage alone.

use rayon::prelude::*;
use std::ffi::OsStr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use super::record::{BatchReport, FileDiagnostics, FileRecord, FileResult, RunRecord, StageFailure};
use super::Interrupt;
use crate::cache::{CacheParams, CacheStore};
use crate::config::Config;
use crate::geometry::{analyze_file, count_issues};
use crate::logger::ProgressLine;
use crate::svg::clean_file;
use crate::tools::{ToolRunner, config_fingerprint, svgo_command, vpype_command};
use crate::utils::display_path;
use crate::utils::fmt::plural_count;
use crate::{debug, log};

/// How a Stage C task ended.
enum Cleaned {
    Done(FileResult),
    Failed(PathBuf),
    Skipped(PathBuf),
}

pub struct Orchestrator<'a> {
    config: &'a Config,
    runner: &'a dyn ToolRunner,
    cache: CacheStore,
    params: CacheParams,
    interrupt: Interrupt,
    show_progress: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn ToolRunner, interrupt: Interrupt) -> Self {
        Self {
            config,
            runner,
            cache: CacheStore::new(config.cache_dir(), config.cache.enable),
            params: CacheParams::new(&config.optimize, config_fingerprint(&config.svgo)),
            interrupt,
            show_progress: true,
        }
    }

    /// Draw the stage progress line (off for JSON output).
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Optimize `files`. Never fails as a whole: problems are recorded in the
    /// report.
    pub fn run(&self, files: &[PathBuf], trigger: &str) -> BatchReport {
        let mut record = RunRecord::now(trigger);

        // Vanished between discovery and now: not part of this batch
        let records: Vec<FileRecord> = files
            .iter()
            .filter_map(|path| {
                let captured = FileRecord::capture(path);
                if captured.is_none() {
                    debug!("optimize"; "skipping missing file: {}", display_path(path));
                }
                captured
            })
            .collect();

        let (hits, misses) = self.partition(records);
        if self.cache.is_enabled() && !hits.is_empty() {
            log!(
                "cache";
                "{} cached, {} to optimize",
                hits.len(),
                misses.len()
            );
        }

        let mut failed = Vec::new();
        let fresh = match self.optimize(misses, &mut failed) {
            Ok(fresh) => fresh,
            Err(stage) => {
                record.success = false;
                return BatchReport {
                    results: Vec::new(),
                    diagnostics: Vec::new(),
                    failed,
                    stage_failure: Some(stage),
                    record,
                };
            }
        };

        for result in &fresh {
            if let Err(e) = self.cache.store(&result.path, result, &self.params) {
                log!("warning"; "cache write failed for {}: {}", display_path(&result.path), e);
            }
        }

        let mut results = hits;
        results.extend(fresh);
        results.sort_by(|a, b| a.path.cmp(&b.path));
        failed.sort();

        let diagnostics = self.diagnose(&results);

        record.file_count = results.len();
        record.bytes_saved = results.iter().map(FileResult::saved).sum();
        record.irregularity_count = diagnostics.iter().map(|d| count_issues(&d.findings)).sum();
        record.success = failed.is_empty();

        BatchReport {
            results,
            diagnostics,
            failed,
            stage_failure: None,
            record,
        }
    }

    fn partition(&self, records: Vec<FileRecord>) -> (Vec<FileResult>, Vec<FileRecord>) {
        let mut hits = Vec::new();
        let mut misses = Vec::new();
        for record in records {
            match self.cache.lookup(&record.path, &self.params) {
                Some(entry) => hits.push(FileResult::from_cache(&record.path, &entry)),
                None => misses.push(record),
            }
        }
        (hits, misses)
    }

    /// Stages A to C over the cache misses.
    fn optimize(
        &self,
        misses: Vec<FileRecord>,
        failed: &mut Vec<PathBuf>,
    ) -> Result<Vec<FileResult>, StageFailure> {
        if misses.is_empty() {
            return Ok(Vec::new());
        }

        let tools = &self.config.tools;
        let svgo_available = tools
            .svgo
            .first()
            .is_some_and(|program| self.runner.is_available(OsStr::new(program)));

        let items = [
            ("vpype", 1),
            ("svgo", usize::from(svgo_available)),
            ("xml", misses.len()),
        ];
        let progress = if self.show_progress {
            ProgressLine::new("optimize", &items)
        } else {
            ProgressLine::hidden("optimize", &items)
        };

        // Stage A: geometry healing, fatal on failure
        let paths: Vec<PathBuf> = misses.iter().map(|r| r.path.clone()).collect();
        let vpype = vpype_command(&tools.vpype, &paths, &self.config.optimize, tools.timeout());
        if let Err(e) = self.runner.run(&vpype) {
            drop(progress);
            log!("error"; "vpype failed, batch aborted: {}", e);
            failed.extend(paths);
            return Err(StageFailure::GeometryHealing);
        }
        progress.inc("vpype");

        let (present, missing): (Vec<FileRecord>, Vec<FileRecord>) =
            misses.into_iter().partition(|r| r.path.is_file());
        for record in missing {
            log!("warning"; "{} disappeared after vpype", display_path(&record.path));
            failed.push(record.path);
        }
        let paths: Vec<PathBuf> = present.iter().map(|r| r.path.clone()).collect();

        // Stage B: minification, degraded on failure
        if !svgo_available {
            debug!("optimize"; "svgo not found, skipping minification");
        } else if !paths.is_empty() {
            match svgo_command(&tools.svgo, &paths, &self.config.svgo, tools.timeout()) {
                Ok(invocation) => match self.runner.run(&invocation.cmd) {
                    Ok(_) => progress.inc("svgo"),
                    Err(e) => log!("warning"; "svgo failed, continuing without it: {}", e),
                },
                Err(e) => log!("warning"; "could not write svgo config: {}", e),
            }
        }

        // Stage C: structural cleanup
        let mut fresh = Vec::with_capacity(present.len());
        let mut skipped = 0;
        for outcome in self.clean_all(present, &progress) {
            match outcome {
                Cleaned::Done(result) => fresh.push(result),
                Cleaned::Failed(path) => failed.push(path),
                Cleaned::Skipped(path) => {
                    skipped += 1;
                    failed.push(path);
                }
            }
        }
        progress.finish();

        if skipped > 0 {
            log!("warning"; "interrupted, {} not cleaned", plural_count(skipped, "file"));
        }
        Ok(fresh)
    }

    fn clean_all(&self, records: Vec<FileRecord>, progress: &ProgressLine) -> Vec<Cleaned> {
        let work = |record: FileRecord| -> Cleaned {
            if self.interrupt.is_triggered() {
                return Cleaned::Skipped(record.path);
            }
            match clean_file(&record.path, &self.config.cleanup) {
                Ok(stats) => {
                    progress.inc("xml");
                    Cleaned::Done(record.finish(Some(stats)))
                }
                Err(e) => {
                    log!("error"; "{}: {}", display_path(&record.path), e);
                    Cleaned::Failed(record.path)
                }
            }
        };

        if records.len() <= 1 {
            return records.into_iter().map(work).collect();
        }

        let threads = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("svgpress-xml-{i}"))
            .build()
        {
            Ok(pool) => pool.install(|| records.into_par_iter().map(work).collect()),
            Err(e) => {
                debug!("optimize"; "thread pool unavailable ({}), cleaning inline", e);
                records.into_iter().map(work).collect()
            }
        }
    }

    /// Read-only geometry report over every file of the batch.
    fn diagnose(&self, results: &[FileResult]) -> Vec<FileDiagnostics> {
        if !self.config.diagnostics.enable {
            return Vec::new();
        }
        let thresholds = self.config.diagnostics.thresholds();
        results
            .iter()
            .filter_map(|result| {
                let findings = analyze_file(&result.path, &thresholds);
                (!findings.is_empty()).then(|| FileDiagnostics {
                    path: result.path.clone(),
                    findings,
                })
            })
            .collect()
    }
}
