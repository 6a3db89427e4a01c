//! Parameter-scoped cache of optimized files.
//!
//! An entry is reused only when the live file still hashes to what was
//! stored, the parameters and minifier fingerprint match, and the cached
//! optimized copy is intact. Entries are evicted by age at startup.

mod entry;
mod evict;
mod key;
mod store;

pub use entry::CacheEntry;
pub use evict::evict_older_than;
pub use key::{CacheParams, cache_key};
pub use store::CacheStore;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache i/o error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize cache entry")]
    Json(#[from] serde_json::Error),
}

impl CacheError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
