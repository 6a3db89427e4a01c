//! `[svgo]` section configuration.
//!
//! Written to a temporary JSON file for each minifier run. Its serialized form
//! is fingerprinted into every cache key, so editing it invalidates the cache.
//!
//! # Example
//!
//! ```toml
//! [svgo]
//! multipass = true
//! plugins = [
//!     "preset-default",
//!     "mergePaths",
//!     { name = "cleanupNumericValues", params = { floatPrecision = 2 } },
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// A plugin entry: bare name or name with parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SvgoPlugin {
    Name(String),
    Configured {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<serde_json::Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgoConfig {
    /// Pass `--multipass`.
    pub multipass: bool,

    pub plugins: Vec<SvgoPlugin>,
}

impl Default for SvgoConfig {
    fn default() -> Self {
        let named = |n: &str| SvgoPlugin::Name(n.to_string());
        Self {
            multipass: true,
            plugins: vec![
                named("preset-default"),
                named("mergePaths"),
                named("convertPathData"),
                named("removeUselessStrokeAndFill"),
                named("moveElemsAttrsToGroup"),
                named("convertStyleToAttrs"),
                SvgoPlugin::Configured {
                    name: "cleanupNumericValues".to_string(),
                    params: Some(serde_json::json!({ "floatPrecision": 2 })),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_svgo_defaults() {
        let config = test_parse_config("");
        assert!(config.svgo.multipass);
        assert_eq!(config.svgo.plugins.len(), 7);
        assert_eq!(
            config.svgo.plugins[0],
            SvgoPlugin::Name("preset-default".to_string())
        );
    }

    #[test]
    fn test_svgo_plugins_from_toml() {
        let config = test_parse_config(
            "[svgo]\nplugins = [\"preset-default\", { name = \"cleanupNumericValues\", params = { floatPrecision = 3 } }]",
        );
        assert_eq!(config.svgo.plugins.len(), 2);
        match &config.svgo.plugins[1] {
            SvgoPlugin::Configured { name, params } => {
                assert_eq!(name, "cleanupNumericValues");
                assert_eq!(params.as_ref().unwrap()["floatPrecision"], 3);
            }
            other => panic!("unexpected plugin: {other:?}"),
        }
    }
}
