//! Minification through a single `svgo` invocation.
//!
//! The plugin list is written to a throwaway JSON config for each run. Its
//! blake3 fingerprint scopes cache entries, so changing plugins or params
//! invalidates everything optimized under the old configuration.

use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

use super::Cmd;
use crate::config::SvgoConfig;
use crate::freshness::hash_bytes;

/// Contents of the `--config` file.
pub fn config_json(config: &SvgoConfig) -> String {
    json!({ "plugins": config.plugins }).to_string()
}

/// Fingerprint of everything that changes svgo's output.
pub fn config_fingerprint(config: &SvgoConfig) -> String {
    let serialized = json!({
        "multipass": config.multipass,
        "plugins": config.plugins,
    })
    .to_string();
    hash_bytes(serialized.as_bytes()).to_hex()
}

/// A config file that lives exactly as long as the invocation using it.
pub struct SvgoInvocation {
    pub cmd: Cmd,
    config_file: NamedTempFile,
}

impl SvgoInvocation {
    pub fn config_path(&self) -> PathBuf {
        self.config_file.path().to_path_buf()
    }
}

/// Write the config and build the batch command for `files`.
///
/// The temp file is removed when the returned value drops, whatever the
/// outcome of the run.
pub fn svgo_command(
    program: &[String],
    files: &[PathBuf],
    config: &SvgoConfig,
    timeout: Option<Duration>,
) -> io::Result<SvgoInvocation> {
    let mut file = tempfile::Builder::new()
        .prefix("svgpress-svgo-")
        .suffix(".json")
        .tempfile()?;
    file.write_all(config_json(config).as_bytes())?;
    file.flush()?;

    let cmd = Cmd::from_slice(program)
        .args(files)
        .arg(if config.multipass { "--multipass" } else { "" })
        .arg("--config")
        .arg(file.path())
        .timeout(timeout);

    Ok(SvgoInvocation {
        cmd,
        config_file: file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SvgoPlugin;

    #[test]
    fn test_config_json_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&config_json(&SvgoConfig::default())).unwrap();
        let plugins = value["plugins"].as_array().unwrap();
        assert_eq!(plugins.len(), 7);
        assert_eq!(plugins[0], "preset-default");
        assert_eq!(plugins[6]["name"], "cleanupNumericValues");
        assert_eq!(plugins[6]["params"]["floatPrecision"], 2);
    }

    #[test]
    fn test_fingerprint_stable_and_sensitive() {
        let config = SvgoConfig::default();
        assert_eq!(config_fingerprint(&config), config_fingerprint(&config.clone()));

        let mut more = config.clone();
        more.plugins.push(SvgoPlugin::Name("removeDimensions".to_string()));
        assert_ne!(config_fingerprint(&config), config_fingerprint(&more));

        let mut single = config.clone();
        single.multipass = false;
        assert_ne!(config_fingerprint(&config), config_fingerprint(&single));
    }

    #[test]
    fn test_config_file_removed_on_drop() {
        let files = [PathBuf::from("a.svg"), PathBuf::from("b.svg")];
        let invocation =
            svgo_command(&["svgo".to_string()], &files, &SvgoConfig::default(), None).unwrap();
        let path = invocation.config_path();
        assert!(path.exists());

        let args: Vec<_> = invocation
            .cmd
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(&args[..4], ["a.svg", "b.svg", "--multipass", "--config"]);
        assert_eq!(args[4], path.to_string_lossy());

        drop(invocation);
        assert!(!path.exists());
    }
}
