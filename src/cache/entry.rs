//! Cache sidecar (`<key>.meta.json`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::CacheParams;
use crate::svg::CleanupStats;

/// Metadata stored next to each cached optimized copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Content hash of the optimized file when it was stored.
    pub original_hash: String,
    pub original_size: u64,
    pub new_size: u64,
    /// Seconds spent optimizing.
    pub elapsed: f64,
    pub deep: bool,
    pub merge: String,
    pub simplify: String,
    pub svgo_config_hash: String,
    /// Absolute source path.
    pub source: PathBuf,
    pub stats: Option<CleanupStats>,
}

impl CacheEntry {
    /// Whether the entry was produced under exactly these parameters.
    pub fn matches(&self, params: &CacheParams) -> bool {
        self.deep == params.deep
            && self.merge == params.merge
            && self.simplify == params.simplify
            && self.svgo_config_hash == params.svgo_config_hash
    }
}
