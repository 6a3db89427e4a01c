//! Configuration management for `svgpress.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # One file per [section]
//! ├── error.rs       # ConfigError
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # Config (this file)
//! ```
//!
//! # Sections
//!
//! | Section         | Purpose                                          |
//! |-----------------|--------------------------------------------------|
//! | `[optimize]`    | Geometry-healing parameters (deep, tolerances)   |
//! | `[cache]`       | Cache location, enable flag, eviction age        |
//! | `[tools]`       | External commands and their timeout              |
//! | `[svgo]`        | Minifier plugin configuration                    |
//! | `[cleanup]`     | Theme variables and themed shapes                |
//! | `[diagnostics]` | Path irregularity thresholds                     |
//! | `[watch]`       | Debounce and dashboard history length            |
//!
//! The file is optional. Without one every section takes its defaults and
//! relative paths resolve against the current directory. CLI flags override
//! file values.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{
    CacheConfig, CleanupConfig, DEEP_SIMPLIFY, DiagnosticsConfig, OptimizeConfig, SvgoConfig,
    SvgoPlugin, ToolsConfig, WatchConfig, is_valid_tolerance,
};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Default config file name, searched upward from the current directory.
pub const DEFAULT_CONFIG_NAME: &str = "svgpress.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing svgpress.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub optimize: OptimizeConfig,
    pub cache: CacheConfig,
    pub tools: ToolsConfig,
    pub svgo: SvgoConfig,
    pub cleanup: CleanupConfig,
    pub diagnostics: DiagnosticsConfig,
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration for a CLI invocation.
    ///
    /// A missing default-named config is fine; a missing file the user named
    /// explicitly is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                config.config_path = Some(crate::utils::normalize_path(&path));
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG_NAME) => {
                return Err(ConfigError::Io(
                    cli.config.clone(),
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                )
                .into());
            }
            None => Self {
                root: cwd.clone(),
                ..Self::default()
            },
        };

        config.apply_cli(cli, &cwd);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("in {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored): {}", display_path, fields.join(", "));
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI flags on top of file values.
    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) {
        if cli.no_deep {
            self.optimize.deep = false;
        }
        Self::update_option(&mut self.optimize.merge, cli.merge.as_ref());
        Self::update_option(&mut self.optimize.simplify, cli.simplify.as_ref());

        if cli.no_cache {
            self.cache.enable = false;
        }
        // CLI paths are relative to where the command runs, not the config file
        if let Some(dir) = &cli.cache_dir {
            self.cache.dir = cwd.join(dir);
        }
        if cli.no_diagnostics {
            self.diagnostics.enable = false;
        }
    }

    fn update_option<T: Clone>(target: &mut T, value: Option<&T>) {
        if let Some(v) = value {
            *target = v.clone();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("optimize.merge", &self.optimize.merge),
            ("optimize.simplify", &self.optimize.simplify),
        ] {
            if !is_valid_tolerance(value) {
                return Err(ConfigError::Validation(format!(
                    "`{field}` must be a non-negative length such as \"0.1mm\", got \"{value}\""
                )));
            }
        }
        if self.tools.vpype.is_empty() {
            return Err(ConfigError::Validation("`tools.vpype` is empty".into()));
        }
        if self.tools.svgo.is_empty() {
            return Err(ConfigError::Validation("`tools.svgo` is empty".into()));
        }
        let d = &self.diagnostics;
        for (field, value) in [
            ("zero_epsilon", d.zero_epsilon),
            ("min_chord", d.min_chord),
            ("handle_ratio", d.handle_ratio),
            ("reversal_degrees", d.reversal_degrees),
            ("length_jump_ratio", d.length_jump_ratio),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "`diagnostics.{field}` must be greater than 0, got {value}"
                )));
            }
        }
        if d.reversal_degrees > 180.0 {
            return Err(ConfigError::Validation(format!(
                "`diagnostics.reversal_degrees` must be at most 180, got {}",
                d.reversal_degrees
            )));
        }
        Ok(())
    }

    /// Absolute cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        if self.cache.dir.is_absolute() {
            self.cache.dir.clone()
        } else {
            self.root.join(&self.cache.dir)
        }
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) =
            Config::parse_with_ignored("[optimize]\nmerge = \"0.2mm\"\nmerg = 1\n[extra]\nx = 1")
                .unwrap();
        assert_eq!(config.optimize.merge, "0.2mm");
        assert_eq!(ignored, vec!["optimize.merg", "extra"]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::parse_with_ignored("[optimize\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "svgpress",
            "icons/*.svg",
            "--no-deep",
            "--merge",
            "0.3mm",
            "--no-cache",
        ]);
        let mut config = Config::default();
        config.apply_cli(&cli, Path::new("/work"));
        assert!(!config.optimize.deep);
        assert_eq!(config.optimize.merge, "0.3mm");
        assert_eq!(config.optimize.simplify, "0.05mm");
        assert!(!config.cache.enable);
    }

    #[test]
    fn test_cli_cache_dir_relative_to_cwd() {
        let cli = Cli::parse_from(["svgpress", "*.svg", "--cache-dir", "tmp/cache"]);
        let mut config = Config {
            root: PathBuf::from("/project"),
            ..Config::default()
        };
        config.apply_cli(&cli, Path::new("/work"));
        assert_eq!(config.cache_dir(), PathBuf::from("/work/tmp/cache"));
    }

    #[test]
    fn test_cache_dir_relative_to_root() {
        let config = Config {
            root: PathBuf::from("/project"),
            ..Config::default()
        };
        assert_eq!(
            config.cache_dir(),
            PathBuf::from("/project/.cache/svg_cache")
        );
    }

    #[test]
    fn test_validate_rejects_bad_tolerance() {
        let mut config = Config::default();
        config.optimize.merge = "lots".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_zero_thresholds() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.diagnostics.zero_epsilon = 0.0;
        match config.validate() {
            Err(ConfigError::Validation(msg)) => assert!(msg.contains("diagnostics.zero_epsilon")),
            other => panic!("unexpected: {other:?}"),
        }

        let mut config = Config::default();
        config.diagnostics.min_chord = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.diagnostics.reversal_degrees = -10.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.diagnostics.handle_ratio = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svgpress.toml");
        fs::write(&path, "[watch]\nhistory = 3\n").unwrap();
        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.watch.history, 3);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Config::from_path(Path::new("/nonexistent/svgpress.toml")).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }
}
