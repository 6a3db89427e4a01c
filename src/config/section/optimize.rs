//! `[optimize]` section configuration.
//!
//! Geometry-healing parameters. Together with the minifier configuration
//! they scope every cache entry.
//!
//! # Example
//!
//! ```toml
//! [optimize]
//! deep = true          # splitall/snap/reloop before merging
//! merge = "0.1mm"      # linemerge tolerance
//! simplify = "0.05mm"  # linesimplify tolerance (no-deep mode only)
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Simplify tolerance used in deep mode, where snapping already healed joints.
pub const DEEP_SIMPLIFY: &str = "0.01mm";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Run the deep steps (`splitall snap <merge> reloop`).
    pub deep: bool,

    /// Tolerance for merging line endpoints.
    pub merge: String,

    /// Tolerance for simplifying lines.
    pub simplify: String,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            deep: true,
            merge: "0.1mm".to_string(),
            simplify: "0.05mm".to_string(),
        }
    }
}

impl OptimizeConfig {
    /// Tolerance actually passed to `linesimplify`.
    pub fn effective_simplify(&self) -> &str {
        if self.deep {
            DEEP_SIMPLIFY
        } else {
            &self.simplify
        }
    }
}

/// Whether `value` looks like a length vpype accepts (`0.1mm`, `2px`, `0.5`).
pub fn is_valid_tolerance(value: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)(?:mm|cm|in|px|pt|pc)?$").unwrap()
    })
    .is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_optimize_defaults() {
        let config = test_parse_config("");
        assert!(config.optimize.deep);
        assert_eq!(config.optimize.merge, "0.1mm");
        assert_eq!(config.optimize.simplify, "0.05mm");
    }

    #[test]
    fn test_effective_simplify() {
        let mut optimize = OptimizeConfig::default();
        assert_eq!(optimize.effective_simplify(), "0.01mm");
        optimize.deep = false;
        assert_eq!(optimize.effective_simplify(), "0.05mm");
    }

    #[test]
    fn test_tolerance_validation() {
        assert!(is_valid_tolerance("0.1mm"));
        assert!(is_valid_tolerance("2px"));
        assert!(is_valid_tolerance(".5"));
        assert!(!is_valid_tolerance("-1mm"));
        assert!(!is_valid_tolerance("mm"));
        assert!(!is_valid_tolerance("0.1 furlongs"));
    }
}
