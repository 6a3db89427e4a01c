//! Machine-readable results for `--json`.

use serde::Serialize;

use crate::pipeline::FileResult;
use crate::svg::CleanupStats;
use crate::utils::display_path;

#[derive(Debug, Serialize)]
struct JsonResult<'a> {
    path: String,
    orig: u64,
    new: u64,
    elapsed: f64,
    stats: Option<&'a CleanupStats>,
    cached: bool,
    saved: u64,
    pct: f64,
}

impl<'a> From<&'a FileResult> for JsonResult<'a> {
    fn from(r: &'a FileResult) -> Self {
        Self {
            path: display_path(&r.path),
            orig: r.original_size,
            new: r.optimized_size,
            elapsed: (r.elapsed * 1000.0).round() / 1000.0,
            stats: r.stats.as_ref(),
            cached: r.cached,
            saved: r.saved(),
            pct: (r.percent() * 10.0).round() / 10.0,
        }
    }
}

/// Ordered results as a pretty-printed JSON array.
pub fn results_json(results: &[FileResult]) -> serde_json::Result<String> {
    let rows: Vec<JsonResult<'_>> = results.iter().map(JsonResult::from).collect();
    serde_json::to_string_pretty(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_results_json_fields() {
        let results = vec![FileResult {
            path: PathBuf::from("/x/a.svg"),
            original_size: 1000,
            optimized_size: 333,
            elapsed: 1.23456,
            stats: Some(CleanupStats {
                attrs_removed: 1,
                groups_removed: 0,
                comments_removed: 2,
            }),
            cached: false,
        }];
        let value: serde_json::Value =
            serde_json::from_str(&results_json(&results).unwrap()).unwrap();
        let row = &value[0];
        assert_eq!(row["path"], "/x/a.svg");
        assert_eq!(row["orig"], 1000);
        assert_eq!(row["new"], 333);
        assert_eq!(row["saved"], 667);
        assert_eq!(row["pct"], 66.7);
        assert_eq!(row["elapsed"], 1.235);
        assert_eq!(row["cached"], false);
        assert_eq!(row["stats"]["comments_removed"], 2);
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(results_json(&[]).unwrap(), "[]");
    }
}
