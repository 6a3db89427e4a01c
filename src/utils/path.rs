//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to the path itself when absolute, otherwise joins it with the
/// current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Shorten a path for display: relative to cwd when possible.
pub fn display_path(path: &Path) -> String {
    let cwd = std::env::current_dir().ok();
    cwd.as_deref()
        .and_then(|cwd| path.strip_prefix(cwd).ok())
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_existing_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("logo.svg");
        std::fs::write(&file, "<svg/>").unwrap();

        let dotted = dir.path().join(".").join("logo.svg");
        assert_eq!(normalize_path(&dotted), file.canonicalize().unwrap());
    }

    #[test]
    fn test_normalize_missing_relative_path() {
        let normalized = normalize_path(Path::new("does/not/exist.svg"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("does/not/exist.svg"));
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let path = Path::new("/definitely/elsewhere/icon.svg");
        assert_eq!(display_path(path), "/definitely/elsewhere/icon.svg");
    }
}
