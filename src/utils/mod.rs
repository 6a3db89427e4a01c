//! Shared helpers used across the pipeline and the CLI.
//!
//! - [`path`]: path normalization and display
//! - [`fs`]: crash-safe writes
//! - [`glob`]: glob pattern expansion to the file set of a batch
//! - [`fmt`]: human-readable sizes, durations and plurals

pub mod fmt;
pub mod fs;
pub mod glob;
pub mod path;

pub use fs::write_atomic;
pub use path::{display_path, normalize_path};
