//! `[tools]` section configuration.
//!
//! External programs are given as command arrays so wrappers work:
//!
//! ```toml
//! [tools]
//! vpype = ["vpype"]
//! svgo = ["npx", "svgo"]
//! timeout_secs = 300
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Geometry-healing command.
    pub vpype: Vec<String>,

    /// Minifier command.
    pub svgo: Vec<String>,

    /// Wall-clock limit per external invocation. `0` disables the limit.
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            vpype: vec!["vpype".to_string()],
            svgo: vec!["svgo".to_string()],
            timeout_secs: 300,
        }
    }
}

impl ToolsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
