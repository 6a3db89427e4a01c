//! Cache key composition.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::OptimizeConfig;

/// Hex length of a cache key (128 bits of blake3 output).
pub const KEY_LEN: usize = 32;

/// Everything besides the file itself that shapes an optimized result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheParams {
    pub deep: bool,
    pub merge: String,
    /// Tolerance actually passed to `linesimplify`.
    pub simplify: String,
    /// Fingerprint of the minifier configuration.
    pub svgo_config_hash: String,
}

impl CacheParams {
    pub fn new(optimize: &OptimizeConfig, svgo_config_hash: impl Into<String>) -> Self {
        Self {
            deep: optimize.deep,
            merge: optimize.merge.clone(),
            simplify: optimize.effective_simplify().to_string(),
            svgo_config_hash: svgo_config_hash.into(),
        }
    }
}

/// Fingerprint of an absolute path under a parameter set.
pub fn cache_key(abs_path: &Path, params: &CacheParams) -> String {
    let mut hasher = blake3::Hasher::new();
    // NUL-separated so adjacent fields cannot run into each other
    for part in [
        &*abs_path.to_string_lossy(),
        if params.deep { "deep" } else { "shallow" },
        params.merge.as_str(),
        params.simplify.as_str(),
        params.svgo_config_hash.as_str(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update(&[0]);
    }
    let digest = hasher.finalize();
    hex::encode(&digest.as_bytes()[..KEY_LEN / 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CacheParams {
        CacheParams::new(&OptimizeConfig::default(), "abc123")
    }

    #[test]
    fn test_key_shape() {
        let key = cache_key(Path::new("/icons/a.svg"), &params());
        assert_eq!(key.len(), KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, cache_key(Path::new("/icons/a.svg"), &params()));
    }

    #[test]
    fn test_key_differs_across_files() {
        let a = cache_key(Path::new("/icons/a.svg"), &params());
        let b = cache_key(Path::new("/icons/b.svg"), &params());
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_differs_across_params() {
        let path = Path::new("/icons/a.svg");
        let base = cache_key(path, &params());

        let mut shallow = params();
        shallow.deep = false;
        assert_ne!(base, cache_key(path, &shallow));

        let mut merge = params();
        merge.merge = "0.2mm".to_string();
        assert_ne!(base, cache_key(path, &merge));

        let mut svgo = params();
        svgo.svgo_config_hash = "def456".to_string();
        assert_ne!(base, cache_key(path, &svgo));
    }

    #[test]
    fn test_simplify_only_matters_without_deep() {
        let mut optimize = OptimizeConfig::default();
        let deep_a = CacheParams::new(&optimize, "x");
        optimize.simplify = "0.2mm".to_string();
        let deep_b = CacheParams::new(&optimize, "x");
        assert_eq!(deep_a, deep_b);

        optimize.deep = false;
        let shallow = CacheParams::new(&optimize, "x");
        assert_eq!(shallow.simplify, "0.2mm");
    }
}
