//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_NAME;

/// Batch SVG optimizer: vpype -> svgo -> structural cleanup, with a cache
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Glob pattern selecting the SVG files (e.g. "assets/**/*.svg")
    #[arg(value_name = "GLOB")]
    pub pattern: String,

    /// Re-run whenever a matched file changes
    #[arg(short, long)]
    pub watch: bool,

    /// Skip the deep geometry steps (splitall, snap, reloop)
    #[arg(long)]
    pub no_deep: bool,

    /// Merge tolerance for line endpoints (e.g. 0.1mm)
    #[arg(long, value_name = "LENGTH")]
    pub merge: Option<String>,

    /// Simplify tolerance, used with --no-deep (e.g. 0.05mm)
    #[arg(long, value_name = "LENGTH")]
    pub simplify: Option<String>,

    /// Print results as JSON on stdout
    #[arg(long, conflicts_with = "watch")]
    pub json: bool,

    /// Bypass the cache: neither read nor write entries
    #[arg(long)]
    pub no_cache: bool,

    /// Cache directory (default: .cache/svg_cache next to the config file)
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub cache_dir: Option<PathBuf>,

    /// Skip the path irregularity report
    #[arg(long)]
    pub no_diagnostics: bool,

    /// Config file path
    #[arg(short = 'C', long, default_value = DEFAULT_CONFIG_NAME, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_and_version_flags_are_distinct() {
        let cli = Cli::parse_from(["svgpress", "*.svg", "-v"]);
        assert!(cli.verbose);
        let err = Cli::try_parse_from(["svgpress", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::parse_from(["svgpress", "icons/*.svg"]);
        assert_eq!(cli.pattern, "icons/*.svg");
        assert!(!cli.watch);
        assert_eq!(cli.config, PathBuf::from("svgpress.toml"));
        assert!(cli.merge.is_none());
    }

    #[test]
    fn test_json_conflicts_with_watch() {
        assert!(Cli::try_parse_from(["svgpress", "*.svg", "--json", "--watch"]).is_err());
    }

    #[test]
    fn test_pattern_required() {
        assert!(Cli::try_parse_from(["svgpress"]).is_err());
    }
}
