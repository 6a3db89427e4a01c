//! svgpress - batch SVG optimizer with geometry healing and a content cache.

mod cache;
mod cli;
mod config;
mod freshness;
mod geometry;
mod logger;
mod pipeline;
mod report;
mod svg;
mod tools;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, RunOptions};
use config::Config;
use pipeline::Interrupt;
use tools::ProcessRunner;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // Before any blocking work
    let interrupt = Interrupt::new();
    interrupt.install_handler()?;

    let config = Config::load(&cli)?;
    let options = RunOptions::from_cli(&cli)?;

    if config.cache.enable {
        evict_stale_entries(&config);
    }

    let code = if cli.watch {
        cli::run_watch(&cli, config, &options, &ProcessRunner, interrupt)?
    } else {
        cli::run_once(&config, &options, &ProcessRunner, interrupt)?
    };
    std::process::exit(code);
}

/// Drop cache entries past `[cache] max_age_days`.
fn evict_stale_entries(config: &Config) {
    let stats = cache::evict_older_than(&config.cache_dir(), config.cache.max_age());
    if stats.files_removed > 0 {
        debug!(
            "cache";
            "evicted {}, {} freed",
            utils::fmt::plural_count(stats.files_removed, "stale file"),
            utils::fmt::fmt_kb(stats.bytes_freed)
        );
    }
}
