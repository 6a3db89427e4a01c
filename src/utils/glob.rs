//! Glob expansion for batch input.
//!
//! A pattern such as `assets/icons/**/*.svg` is split into a literal base
//! directory (`assets/icons`) and the remaining pattern (`**/*.svg`). The base
//! is walked with `jwalk` and each relative path is matched with `globset`.
//! A pattern without wildcards names a single file or a directory (whose
//! `.svg` files are all taken). Hidden entries (such as `.cache/`) are
//! never walked.

use globset::{GlobBuilder, GlobMatcher};
use jwalk::WalkDir;
use std::path::{Component, Path, PathBuf};

/// Characters that start a glob construct.
const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// A compiled input pattern.
#[derive(Debug, Clone)]
pub struct InputPattern {
    original: String,
    base: PathBuf,
    matcher: Option<GlobMatcher>,
}

impl InputPattern {
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let (base, rest) = split_base(pattern);
        let matcher = match rest {
            Some(rest) => Some(
                GlobBuilder::new(&rest)
                    .literal_separator(true)
                    .build()?
                    .compile_matcher(),
            ),
            None => None,
        };
        Ok(Self {
            original: pattern.to_string(),
            base,
            matcher,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.original
    }

    /// Directory the walk starts from (also what watch mode observes).
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Whether `path` (absolute or relative to cwd) is selected by this pattern.
    pub fn matches(&self, path: &Path) -> bool {
        if !is_svg(path) {
            return false;
        }
        let base = crate::utils::normalize_path(&self.base);
        let path = crate::utils::normalize_path(path);
        match &self.matcher {
            Some(matcher) => path
                .strip_prefix(&base)
                .is_ok_and(|rel| matcher.is_match(rel)),
            None if base.is_dir() => path.starts_with(&base),
            None => path == base,
        }
    }

    /// Expand to the sorted list of matching `.svg` files.
    pub fn expand(&self) -> Vec<PathBuf> {
        let Some(matcher) = &self.matcher else {
            return self.expand_literal();
        };
        if !self.base.is_dir() {
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.base)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .filter(|p| is_svg(p))
            .filter(|p| {
                p.strip_prefix(&self.base)
                    .is_ok_and(|rel| matcher.is_match(rel))
            })
            .collect();
        files.sort();
        files
    }

    fn expand_literal(&self) -> Vec<PathBuf> {
        if self.base.is_file() {
            return if is_svg(&self.base) {
                vec![self.base.clone()]
            } else {
                Vec::new()
            };
        }
        if !self.base.is_dir() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&self.base)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .filter(|p| is_svg(p))
            .collect();
        files.sort();
        files
    }
}

/// Case-insensitive `.svg` extension check.
pub fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Split a pattern at its first component containing glob syntax.
fn split_base(pattern: &str) -> (PathBuf, Option<String>) {
    let path = Path::new(pattern);
    let mut base = PathBuf::new();
    let mut rest: Vec<String> = Vec::new();

    for component in path.components() {
        let text = component.as_os_str().to_string_lossy();
        if rest.is_empty() && !text.contains(GLOB_META) {
            base.push(component);
            continue;
        }
        if let Component::Normal(_) | Component::CurDir | Component::ParentDir = component {
            rest.push(text.into_owned());
        }
    }

    if base.as_os_str().is_empty() {
        base.push(".");
    }
    if rest.is_empty() {
        (base, None)
    } else {
        (base, Some(rest.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<svg/>").unwrap();
        path
    }

    #[test]
    fn test_split_base() {
        assert_eq!(
            split_base("assets/icons/**/*.svg"),
            (PathBuf::from("assets/icons"), Some("**/*.svg".to_string()))
        );
        assert_eq!(
            split_base("*.svg"),
            (PathBuf::from("."), Some("*.svg".to_string()))
        );
        assert_eq!(split_base("logo.svg"), (PathBuf::from("logo.svg"), None));
    }

    #[test]
    fn test_expand_recursive_glob() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.svg");
        let b = touch(dir.path(), "nested/deep/b.SVG");
        touch(dir.path(), "nested/readme.md");

        let pattern = InputPattern::new(&format!("{}/**/*.{{svg,SVG}}", dir.path().display())).unwrap();
        assert_eq!(pattern.expand(), vec![a, b]);
    }

    #[test]
    fn test_expand_single_level_glob() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.svg");
        touch(dir.path(), "nested/b.svg");

        let pattern = InputPattern::new(&format!("{}/*.svg", dir.path().display())).unwrap();
        assert_eq!(pattern.expand(), vec![a]);
    }

    #[test]
    fn test_expand_literal_file_and_dir() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.svg");
        let b = touch(dir.path(), "sub/b.svg");

        let single = InputPattern::new(&a.display().to_string()).unwrap();
        assert_eq!(single.expand(), vec![a.clone()]);

        let whole = InputPattern::new(&dir.path().display().to_string()).unwrap();
        assert_eq!(whole.expand(), vec![a, b]);
    }

    #[test]
    fn test_matches() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "icons/a.svg");
        let other = touch(dir.path(), "other/a.svg");

        let pattern = InputPattern::new(&format!("{}/icons/*.svg", dir.path().display())).unwrap();
        assert!(pattern.matches(&a));
        assert!(!pattern.matches(&other));
        assert!(!pattern.matches(&dir.path().join("icons/a.png")));
    }

    #[test]
    fn test_is_svg() {
        assert!(is_svg(Path::new("a.svg")));
        assert!(is_svg(Path::new("a.SvG")));
        assert!(!is_svg(Path::new("a.svgz")));
        assert!(!is_svg(Path::new("svg")));
    }
}
