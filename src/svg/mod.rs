//! Structural SVG cleanup.
//!
//! ```text
//! svg/
//! ├── dom.rs     # Arena tree over quick-xml events
//! ├── rules.rs   # Namespace and attribute tables
//! └── clean.rs   # Cleanup passes
//! ```

mod clean;
mod dom;
mod rules;

pub use clean::{clean_file, clean_markup};
pub use dom::Document;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::fmt::plural_count;

/// What one cleanup pass removed from a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupStats {
    pub attrs_removed: usize,
    pub groups_removed: usize,
    pub comments_removed: usize,
}

impl CleanupStats {
    pub fn total(&self) -> usize {
        self.attrs_removed + self.groups_removed + self.comments_removed
    }
}

impl std::ops::AddAssign for CleanupStats {
    fn add_assign(&mut self, other: Self) {
        self.attrs_removed += other.attrs_removed;
        self.groups_removed += other.groups_removed;
        self.comments_removed += other.comments_removed;
    }
}

impl fmt::Display for CleanupStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            (self.attrs_removed, "attr"),
            (self.groups_removed, "empty group"),
            (self.comments_removed, "comment"),
        ]
        .into_iter()
        .filter(|&(count, _)| count > 0)
        .map(|(count, noun)| plural_count(count, noun))
        .collect();

        if parts.is_empty() {
            f.write_str("nothing")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_display() {
        assert_eq!(CleanupStats::default().to_string(), "nothing");
        let stats = CleanupStats {
            attrs_removed: 3,
            groups_removed: 1,
            comments_removed: 0,
        };
        assert_eq!(stats.to_string(), "3 attrs, 1 empty group");
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn test_stats_display_singular_parts() {
        let stats = CleanupStats {
            attrs_removed: 1,
            groups_removed: 0,
            comments_removed: 2,
        };
        assert_eq!(stats.to_string(), "1 attr, 2 comments");
    }

    #[test]
    fn test_stats_add_assign() {
        let mut total = CleanupStats::default();
        total += CleanupStats {
            attrs_removed: 1,
            groups_removed: 2,
            comments_removed: 3,
        };
        total += CleanupStats {
            attrs_removed: 1,
            ..Default::default()
        };
        assert_eq!(total.attrs_removed, 2);
        assert_eq!(total.total(), 7);
    }
}
