//! `[diagnostics]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [diagnostics]
//! enable = true
//! reversal_degrees = 150.0
//! length_jump_ratio = 10.0
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::Thresholds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub enable: bool,
    pub zero_epsilon: f64,
    pub min_chord: f64,
    pub handle_ratio: f64,
    pub reversal_degrees: f64,
    pub length_jump_ratio: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        let t = Thresholds::default();
        Self {
            enable: true,
            zero_epsilon: t.zero_epsilon,
            min_chord: t.min_chord,
            handle_ratio: t.handle_ratio,
            reversal_degrees: t.reversal_degrees,
            length_jump_ratio: t.length_jump_ratio,
        }
    }
}

impl DiagnosticsConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            zero_epsilon: self.zero_epsilon,
            min_chord: self.min_chord,
            handle_ratio: self.handle_ratio,
            reversal_degrees: self.reversal_degrees,
            length_jump_ratio: self.length_jump_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::geometry::Thresholds;

    #[test]
    fn test_thresholds_partial_override() {
        let config = test_parse_config("[diagnostics]\nreversal_degrees = 120.0");
        let t = config.diagnostics.thresholds();
        assert_eq!(t.reversal_degrees, 120.0);
        assert_eq!(t.length_jump_ratio, Thresholds::default().length_jump_ratio);
        assert!(config.diagnostics.enable);
    }
}
