//! On-disk content cache.
//!
//! [`ContentCacheStore`] keeps at most one version of every
//! (kind, language) pair, named by commit hash so that files are never
//! rewritten in place. [`KeyLocks`] serialises work on one resource.

pub mod entry;
pub mod lock;
pub mod store;

pub use entry::{CacheInfo, CachedEntry};
pub use lock::KeyLocks;
pub use store::ContentCacheStore;

/// Get the default cache directory.
pub fn default_cache_dir() -> std::path::PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("contentsync")
}
