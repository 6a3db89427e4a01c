//! Single batch run.

use anyhow::{Context, Result};

use super::{OutputMode, RunOptions, discover};
use crate::config::Config;
use crate::pipeline::{BatchReport, Interrupt, Orchestrator};
use crate::report::{print_report, results_json};
use crate::tools::ToolRunner;
use crate::utils::{display_path, fmt::plural_count};
use crate::{debug, log};

/// Optimize every matched file once and print the outcome.
///
/// Returns the process exit code: 0 when every file made it through, 1 when
/// geometry healing failed or any file is missing from the results.
pub fn run_once(
    config: &Config,
    options: &RunOptions,
    runner: &dyn ToolRunner,
    interrupt: Interrupt,
) -> Result<i32> {
    let files = discover(&options.pattern, config);
    debug!("once"; "{} matched {}", options.pattern.pattern(), plural_count(files.len(), "file"));

    let report = Orchestrator::new(config, runner, interrupt)
        .show_progress(options.output == OutputMode::Human)
        .run(&files, "manual run");
    debug!("once"; "{} of {} served from cache", report.hits(), report.results.len());

    match options.output {
        OutputMode::Json => {
            let json = results_json(&report.results).context("failed to serialize results")?;
            println!("{json}");
        }
        OutputMode::Human => {
            if files.is_empty() {
                log!("once"; "no svg files match {}", options.pattern.pattern());
            }
            print_report(&report);
        }
    }
    log_failures(&report);

    Ok(exit_code(&report))
}

fn log_failures(report: &BatchReport) {
    if let Some(failure) = &report.stage_failure {
        log!("error"; "{}", failure);
    }
    for path in &report.failed {
        log!("error"; "not optimized: {}", display_path(path));
    }
}

pub(super) fn exit_code(report: &BatchReport) -> i32 {
    i32::from(!report.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{RunRecord, StageFailure};
    use std::path::PathBuf;

    fn report() -> BatchReport {
        BatchReport {
            results: Vec::new(),
            diagnostics: Vec::new(),
            failed: Vec::new(),
            stage_failure: None,
            record: RunRecord::now("test"),
        }
    }

    #[test]
    fn test_exit_code_clean_batch() {
        assert_eq!(exit_code(&report()), 0);
    }

    #[test]
    fn test_exit_code_stage_failure() {
        let mut report = report();
        report.stage_failure = Some(StageFailure::GeometryHealing);
        assert_eq!(exit_code(&report), 1);
    }

    #[test]
    fn test_exit_code_failed_file() {
        let mut report = report();
        report.failed.push(PathBuf::from("a.svg"));
        assert_eq!(exit_code(&report), 1);
    }
}
