//! External tools: the geometry healer and the minifier.
//!
//! Each tool runs once per batch over every file that missed the cache.

mod exec;
mod svgo;
mod vpype;

pub use exec::{Cmd, ProcessRunner, ToolRunner};
#[cfg(test)]
pub use exec::{ToolError, ToolOutput};
pub use svgo::{config_fingerprint, svgo_command};
pub use vpype::vpype_command;
