//! `[cleanup]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cleanup]
//! shapes = ["path", "polygon"]
//! fill_var = "var(--logo-fill, currentColor)"
//! stroke_var = "var(--logo-stroke, currentColor)"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Elements whose fill is always themed.
    pub shapes: Vec<String>,

    /// Replacement for concrete fills.
    pub fill_var: String,

    /// Replacement for concrete strokes.
    pub stroke_var: String,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            shapes: vec!["path".to_string(), "polygon".to_string()],
            fill_var: "var(--logo-fill, currentColor)".to_string(),
            stroke_var: "var(--logo-stroke, currentColor)".to_string(),
        }
    }
}

impl CleanupConfig {
    pub fn is_shape(&self, local_name: &str) -> bool {
        self.shapes.iter().any(|s| s == local_name)
    }
}
