//! Content hashing (blake3) for change detection.
//!
//! Files are rewritten in place by every stage, so hashes are always
//! computed from disk and never memoized.

mod hash;

pub use hash::{ContentHash, compute_file_hash, hash_bytes};
