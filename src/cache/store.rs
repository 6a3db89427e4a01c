//! Content-addressed store of optimized files.
//!
//! ```text
//! <cache>/
//! └── 3f/
//!     ├── 3fa9…c2.svg         # optimized copy
//!     └── 3fa9…c2.meta.json   # CacheEntry sidecar
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::{CacheEntry, CacheError, CacheParams, cache_key};
use crate::debug;
use crate::freshness::{compute_file_hash, hash_bytes};
use crate::pipeline::FileResult;
use crate::utils::{normalize_path, write_atomic};

#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    enabled: bool,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn shard(&self, key: &str) -> PathBuf {
        self.dir.join(&key[..2])
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.shard(key).join(format!("{key}.svg"))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.shard(key).join(format!("{key}.meta.json"))
    }

    /// Find a still-valid entry for `file`. Any doubt is a miss.
    pub fn lookup(&self, file: &Path, params: &CacheParams) -> Option<CacheEntry> {
        if !self.enabled {
            return None;
        }
        let key = cache_key(&normalize_path(file), params);

        let content = fs::read_to_string(self.meta_path(&key)).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("cache"; "corrupt sidecar for {}: {}", file.display(), e);
                return None;
            }
        };
        if !entry.matches(params) {
            return None;
        }

        let live = compute_file_hash(file);
        if live.is_empty() || live.to_hex() != entry.original_hash {
            debug!("cache"; "content changed: {} ({})", file.display(), live);
            return None;
        }
        if compute_file_hash(&self.blob_path(&key)) != live {
            debug!("cache"; "optimized copy missing or stale: {}", file.display());
            return None;
        }

        Some(entry)
    }

    /// Record the freshly optimized `file`.
    ///
    /// The optimized copy goes in first, then the sidecar replaces any previous
    /// one atomically, so a sidecar never points at a half-written copy.
    pub fn store(
        &self,
        file: &Path,
        result: &FileResult,
        params: &CacheParams,
    ) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }
        let source = normalize_path(file);
        let key = cache_key(&source, params);

        let shard = self.shard(&key);
        fs::create_dir_all(&shard).map_err(|e| CacheError::io(&shard, e))?;

        let bytes = fs::read(file).map_err(|e| CacheError::io(file, e))?;
        let blob = self.blob_path(&key);
        write_atomic(&blob, &bytes).map_err(|e| CacheError::io(&blob, e))?;

        let entry = CacheEntry {
            original_hash: hash_bytes(&bytes).to_hex(),
            original_size: result.original_size,
            new_size: result.optimized_size,
            elapsed: result.elapsed,
            deep: params.deep,
            merge: params.merge.clone(),
            simplify: params.simplify.clone(),
            svgo_config_hash: params.svgo_config_hash.clone(),
            source,
            stats: result.stats,
        };
        let json = serde_json::to_vec_pretty(&entry)?;
        let meta = self.meta_path(&key);
        write_atomic(&meta, &json).map_err(|e| CacheError::io(&meta, e))?;

        Ok(())
    }
}
