//! Path geometry diagnostics.
//!
//! Reads `d` attributes, rebuilds absolute geometry and flags segments that
//! usually mean broken artwork: zero-length segments, collapsed Bézier
//! handles, direction reversals and isolated length spikes.
//!
//! Everything here is read-only. Malformed data yields no findings rather
//! than an error.

mod analyze;
mod irregularity;
mod tokenize;

pub use analyze::{analyze_path, analyze_path_with};
pub use irregularity::{IrregularityKind, PathIrregularity, Thresholds};

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::svg::Document;

/// Findings for one `<path>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathFindings {
    /// `id`, else `class`, else `path[<index>]`.
    pub label: String,
    pub issues: Vec<PathIrregularity>,
}

/// Analyze every `<path>` in a file. Only paths with findings are returned.
pub fn analyze_file(path: &Path, thresholds: &Thresholds) -> Vec<PathFindings> {
    let Ok(source) = fs::read_to_string(path) else {
        return Vec::new();
    };
    analyze_markup(&source, thresholds)
}

pub fn analyze_markup(source: &str, thresholds: &Thresholds) -> Vec<PathFindings> {
    let Ok(doc) = Document::parse(source) else {
        return Vec::new();
    };

    doc.elements()
        .into_iter()
        .filter_map(|id| doc.element(id))
        .filter(|element| element.local_name() == "path")
        .enumerate()
        .filter_map(|(index, element)| {
            let d = element.attr("d").map(str::trim).filter(|d| !d.is_empty())?;
            let issues = analyze_path_with(d, thresholds);
            if issues.is_empty() {
                return None;
            }
            let label = element
                .attr("id")
                .or_else(|| element.attr("class"))
                .filter(|s| !s.is_empty())
                .map_or_else(|| format!("path[{index}]"), str::to_string);
            Some(PathFindings { label, issues })
        })
        .collect()
}

/// Total findings across a file's paths.
pub fn count_issues(findings: &[PathFindings]) -> usize {
    findings.iter().map(|f| f.issues.len()).sum()
}
