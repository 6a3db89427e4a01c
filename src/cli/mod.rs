//! Command-line interface module.
//!
//! - [`args`]: clap definitions
//! - [`once`]: optimize the matched files and exit
//! - [`watch`]: optimize, then re-run whenever a matched file changes

pub mod args;
mod once;
mod watch;

pub use args::Cli;
pub use once::run_once;
pub use watch::run_watch;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;
use crate::utils::glob::InputPattern;
use crate::utils::normalize_path;

/// Where results go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Progress line, table and irregularities on the terminal.
    Human,
    /// Results array on stdout, nothing else there.
    Json,
}

impl OutputMode {
    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

/// Per-invocation settings shared by both run modes.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub pattern: InputPattern,
    pub output: OutputMode,
}

impl RunOptions {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let pattern = InputPattern::new(&cli.pattern)
            .with_context(|| format!("invalid glob pattern `{}`", cli.pattern))?;
        let output = if cli.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Ok(Self { pattern, output })
    }
}

/// Files matched by the pattern, minus anything inside the cache directory.
pub fn discover(pattern: &InputPattern, config: &Config) -> Vec<PathBuf> {
    let cache_dir = normalize_path(&config.cache_dir());
    pattern
        .expand()
        .into_iter()
        .filter(|path| !normalize_path(path).starts_with(&cache_dir))
        .collect()
}
