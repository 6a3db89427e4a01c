//! `[cache]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! enable = true
//! dir = ".cache/svg_cache"   # relative to the config file's directory
//! max_age_days = 30          # entries older than this are evicted at startup
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enable: bool,
    pub dir: PathBuf,
    pub max_age_days: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: true,
            dir: PathBuf::from(".cache/svg_cache"),
            max_age_days: 30,
        }
    }
}

impl CacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_days * 24 * 60 * 60)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::time::Duration;

    #[test]
    fn test_cache_config() {
        let config = test_parse_config("[cache]\nenable = false\nmax_age_days = 2");
        assert!(!config.cache.enable);
        assert_eq!(config.cache.max_age(), Duration::from_secs(2 * 86_400));
    }
}
