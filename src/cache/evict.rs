//! Age-based eviction.

use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionStats {
    pub files_removed: usize,
    pub dirs_removed: usize,
    pub bytes_freed: u64,
}

/// Delete every file under `dir` last modified more than `max_age` ago, then
/// prune directories left empty. `dir` itself is kept.
///
/// Best effort: entries that cannot be inspected or removed are skipped.
pub fn evict_older_than(dir: &Path, max_age: Duration) -> EvictionStats {
    let mut stats = EvictionStats::default();
    if !dir.is_dir() {
        return stats;
    }
    let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
        return stats;
    };

    let mut dirs: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).skip_hidden(false).into_iter().flatten() {
        let path = entry.path();
        if entry.file_type().is_dir() {
            if path != dir {
                dirs.push(path);
            }
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        let expired = meta.modified().is_ok_and(|modified| modified < cutoff);
        if expired && fs::remove_file(&path).is_ok() {
            stats.files_removed += 1;
            stats.bytes_freed += meta.len();
        }
    }

    // Deepest first so parents empty out before they are visited
    dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
    for d in dirs {
        // Fails on non-empty directories, which is what we want
        if fs::remove_dir(&d).is_ok() {
            stats.dirs_removed += 1;
        }
    }

    debug!(
        "cache";
        "evicted {} files, {} dirs from {}",
        stats.files_removed,
        stats.dirs_removed,
        dir.display()
    );
    stats
}
