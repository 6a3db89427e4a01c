//! Geometry healing through a single `vpype` invocation.
//!
//! vpype chains commands, so every file gets its own
//! `read … write` block and the interpreter starts only once per batch:
//!
//! ```text
//! vpype read a.svg splitall snap 0.1mm reloop linemerge -t 0.1mm occult \
//!       linesimplify -t 0.01mm linesort write a.svg \
//!       read b.svg …
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::Cmd;
use crate::config::OptimizeConfig;

/// Subcommands healing one file in place.
fn file_block(file: &Path, optimize: &OptimizeConfig) -> Vec<String> {
    let file = file.to_string_lossy().into_owned();
    let mut tokens = vec!["read".to_string(), file.clone()];
    if optimize.deep {
        tokens.extend(["splitall", "snap", optimize.merge.as_str(), "reloop"].map(String::from));
    }
    tokens.extend(
        [
            "linemerge",
            "-t",
            optimize.merge.as_str(),
            "occult",
            "linesimplify",
            "-t",
            optimize.effective_simplify(),
            "linesort",
            "write",
        ]
        .map(String::from),
    );
    tokens.push(file);
    tokens
}

/// Build the batch command for `files`.
pub fn vpype_command(
    program: &[String],
    files: &[PathBuf],
    optimize: &OptimizeConfig,
    timeout: Option<Duration>,
) -> Cmd {
    files
        .iter()
        .fold(Cmd::from_slice(program), |cmd, file| {
            cmd.args(file_block(file, optimize))
        })
        .timeout(timeout)
}
