//! Presentation of batch results.
//!
//! - [`table`]: per-file results table and irregularity blocks
//! - [`json`]: `--json` output
//! - [`dashboard`]: watch-mode screen with run history

pub mod dashboard;
pub mod json;
pub mod table;

pub use dashboard::{History, print_dashboard};
pub use json::results_json;
pub use table::print_report;
