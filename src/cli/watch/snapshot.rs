use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::debouncer::ChangeKind;
use crate::freshness::{ContentHash, compute_file_hash};
use crate::utils::normalize_path;

/// Content hashes of the watched files as they stood after the last run.
///
/// Every run rewrites its files in place, so a notify event alone says
/// nothing. A path counts as changed only when its bytes differ from here.
#[derive(Debug, Default)]
pub(super) struct Snapshot {
    hashes: FxHashMap<PathBuf, ContentHash>,
}

impl Snapshot {
    /// Forget everything and hash `files` as they are now.
    pub(super) fn refresh(&mut self, files: &[PathBuf]) {
        self.hashes = files
            .iter()
            .map(|path| (normalize_path(path), compute_file_hash(path)))
            .filter(|(_, hash)| !hash.is_empty())
            .collect();
    }

    /// Check a debounced event against the file's bytes and record the new
    /// state. Returns the confirmed kind, or `None` for a no-op write.
    pub(super) fn confirm(&mut self, path: &Path, kind: ChangeKind) -> Option<ChangeKind> {
        let hash = compute_file_hash(path);
        if kind == ChangeKind::Removed || hash.is_empty() {
            return self.hashes.remove(path).map(|_| ChangeKind::Removed);
        }
        match self.hashes.insert(path.to_path_buf(), hash) {
            None => Some(ChangeKind::Created),
            Some(old) if old != hash => Some(ChangeKind::Modified),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rewrite_with_same_bytes_is_not_a_change() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.svg");
        fs::write(&file, "<svg/>").unwrap();
        let file = normalize_path(&file);

        let mut snapshot = Snapshot::default();
        snapshot.refresh(std::slice::from_ref(&file));
        fs::write(&file, "<svg/>").unwrap();
        assert_eq!(snapshot.confirm(&file, ChangeKind::Modified), None);

        fs::write(&file, "<svg></svg>").unwrap();
        assert_eq!(
            snapshot.confirm(&file, ChangeKind::Modified),
            Some(ChangeKind::Modified)
        );
        // Recorded: the same event again is a no-op
        assert_eq!(snapshot.confirm(&file, ChangeKind::Modified), None);
    }

    #[test]
    fn test_new_and_removed_files() {
        let dir = TempDir::new().unwrap();
        let file = normalize_path(&dir.path().join("b.svg"));
        let mut snapshot = Snapshot::default();

        fs::write(&file, "<svg/>").unwrap();
        assert_eq!(
            snapshot.confirm(&file, ChangeKind::Modified),
            Some(ChangeKind::Created)
        );
        assert_eq!(snapshot.confirm(&file, ChangeKind::Modified), None);

        fs::remove_file(&file).unwrap();
        assert_eq!(
            snapshot.confirm(&file, ChangeKind::Removed),
            Some(ChangeKind::Removed)
        );
        assert_eq!(snapshot.confirm(&file, ChangeKind::Removed), None);
    }
}
