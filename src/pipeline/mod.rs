//! Batch optimization pipeline.
//!
//! # Stages
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │ partition   cache hits skip everything below      │
//! ├───────────────────────────────────────────────────┤
//! │ A  vpype    one process, fatal on failure         │
//! │ B  svgo     one process, skipped if not installed │
//! │ C  cleanup  in-process, rayon pool                │
//! ├───────────────────────────────────────────────────┤
//! │ store → diagnose → BatchReport                    │
//! └───────────────────────────────────────────────────┘
//! ```

mod interrupt;
mod orchestrator;
mod record;

pub use interrupt::Interrupt;
pub use orchestrator::Orchestrator;
pub use record::{BatchReport, FileDiagnostics, FileResult, RunRecord, StageFailure};
