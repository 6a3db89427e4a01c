//! Watch mode.
//!
//! ```text
//! notify ─► Debouncer (quiet window) ─► Snapshot (content hash) ─► run ─► dashboard
//! ```
//!
//! Every run rewrites its files, which fires notify again. The snapshot is
//! refreshed after each run, so those events hash equal and are dropped.
//! Changes to the config file reload it before the next run.

mod debouncer;
mod snapshot;

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use super::{Cli, RunOptions, discover};
use crate::config::Config;
use crate::freshness::{ContentHash, compute_file_hash};
use crate::logger::WatchStatus;
use crate::pipeline::{Interrupt, Orchestrator};
use crate::report::{History, print_dashboard};
use crate::tools::ToolRunner;
use crate::utils::{display_path, normalize_path};
use crate::{debug, log};
use debouncer::{ChangeKind, Debouncer};
use snapshot::Snapshot;

/// Upper bound on how long the loop blocks before checking for Ctrl+C.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Mutable state of one watch session.
struct Session<'a> {
    cli: &'a Cli,
    config: Config,
    config_hash: ContentHash,
    options: &'a RunOptions,
    runner: &'a dyn ToolRunner,
    interrupt: Interrupt,
    snapshot: Snapshot,
    history: History,
    status: WatchStatus,
}

/// Run once, then again after every confirmed change until Ctrl+C.
pub fn run_watch(
    cli: &Cli,
    config: Config,
    options: &RunOptions,
    runner: &dyn ToolRunner,
    interrupt: Interrupt,
) -> Result<i32> {
    let (tx, rx) = mpsc::channel();
    // Attach before the first run so no edit made during it is lost
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .context("failed to create file watcher")?;
    for (root, mode) in watch_roots(options.pattern.base(), config.config_path.as_deref()) {
        debug!("watch"; "watching {} ({:?})", root.display(), mode);
        watcher
            .watch(&root, mode)
            .with_context(|| format!("failed to watch {}", root.display()))?;
    }

    let mut session = Session {
        cli,
        config_hash: config
            .config_path
            .as_deref()
            .map_or_else(ContentHash::empty, compute_file_hash),
        history: History::new(config.watch.history),
        config,
        options,
        runner,
        interrupt,
        snapshot: Snapshot::default(),
        status: WatchStatus::new(),
    };
    let mut debouncer = Debouncer::new(session.config.watch.debounce());

    session.run("initial run");

    while !session.interrupt.is_triggered() {
        match rx.recv_timeout(debouncer.sleep_duration().min(POLL_INTERVAL)) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            Ok(Err(e)) => log!("watch"; "notify error: {}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let Some(changes) = debouncer.take_if_ready() else {
            continue;
        };
        let mut changes: Vec<_> = changes.into_iter().collect();
        changes.sort_by(|a, b| a.0.cmp(&b.0));

        if session.config_changed(&changes) {
            if session.reload_config() {
                debouncer = Debouncer::new(session.config.watch.debounce());
                session.run("config reloaded");
            }
            continue;
        }
        if let Some(trigger) = session.confirm(&changes) {
            session.run(&trigger);
        }
    }

    log!("watch"; "stopped");
    Ok(0)
}

impl Session<'_> {
    fn run(&mut self, trigger: &str) {
        let files = discover(&self.options.pattern, &self.config);
        let report =
            Orchestrator::new(&self.config, self.runner, self.interrupt.clone()).run(&files, trigger);
        self.snapshot.refresh(&files);
        self.history.push(report.record.clone());
        print_dashboard(Some(&report), &self.history, self.options.pattern.pattern());
        self.status.detach();
    }

    fn config_changed(&mut self, changes: &[(PathBuf, ChangeKind)]) -> bool {
        let Some(config_path) = self.config.config_path.as_deref() else {
            return false;
        };
        if !changes.iter().any(|(path, _)| path == config_path) {
            return false;
        }
        let hash = compute_file_hash(config_path);
        if hash == self.config_hash {
            return false;
        }
        self.config_hash = hash;
        true
    }

    /// Load the config again. A broken file keeps the previous config.
    fn reload_config(&mut self) -> bool {
        match Config::load(self.cli) {
            Ok(config) => {
                self.config = config;
                true
            }
            Err(e) => {
                self.status
                    .error("config reload failed, keeping previous config", &format!("{e:#}"));
                false
            }
        }
    }

    /// Content-confirmed changes to matched files, as a trigger description.
    fn confirm(&mut self, changes: &[(PathBuf, ChangeKind)]) -> Option<String> {
        let cache_dir = normalize_path(&self.config.cache_dir());
        let pattern = &self.options.pattern;
        let snapshot = &mut self.snapshot;
        let confirmed: Vec<(&Path, ChangeKind)> = changes
            .iter()
            .filter(|(path, _)| !path.starts_with(&cache_dir))
            .filter(|(path, _)| pattern.matches(path))
            .filter_map(|(path, kind)| {
                snapshot
                    .confirm(path, *kind)
                    .map(|kind| (path.as_path(), kind))
            })
            .collect();

        match confirmed.as_slice() {
            [] => None,
            [(path, kind)] => Some(format!("{}: {}", kind.label(), display_path(path))),
            many => Some(format!("{} files changed", many.len())),
        }
    }
}

/// Directories to observe: the pattern's base recursively, plus the config
/// file's directory when the base does not already cover it.
fn watch_roots(base: &Path, config_path: Option<&Path>) -> Vec<(PathBuf, RecursiveMode)> {
    let base = normalize_path(base);
    let mut roots = Vec::new();
    if base.is_dir() {
        roots.push((base.clone(), RecursiveMode::Recursive));
    } else if let Some(parent) = base.parent() {
        roots.push((parent.to_path_buf(), RecursiveMode::NonRecursive));
    }

    if let Some(dir) = config_path.and_then(Path::parent) {
        let covered = roots.iter().any(|(root, mode)| match mode {
            RecursiveMode::Recursive => dir.starts_with(root),
            RecursiveMode::NonRecursive => dir == root,
        });
        if !covered {
            roots.push((dir.to_path_buf(), RecursiveMode::NonRecursive));
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_watch_roots_directory_base() {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        let config = root.join("svgpress.toml");

        let roots = watch_roots(dir.path(), Some(&config));
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].0, root);
        assert_eq!(roots[0].1, RecursiveMode::Recursive);
    }

    #[test]
    fn test_watch_roots_adds_config_dir() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("icons");
        fs::create_dir(&icons).unwrap();
        let config = normalize_path(dir.path()).join("svgpress.toml");

        let roots = watch_roots(&icons, Some(&config));
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[1], (normalize_path(dir.path()), RecursiveMode::NonRecursive));
    }

    #[test]
    fn test_watch_roots_single_file_base() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("logo.svg");
        fs::write(&file, "<svg/>").unwrap();

        let roots = watch_roots(&file, None);
        assert_eq!(
            roots,
            vec![(normalize_path(dir.path()), RecursiveMode::NonRecursive)]
        );
    }
}
