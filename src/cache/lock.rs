//! Per-key mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::resource::LogicalKey;

/// Lock table with one mutex per [`LogicalKey`].
///
/// Holding a key's lock serialises the live fetch and cache write for that
/// resource; other keys proceed independently.
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<LogicalKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex for `key`, created on first use.
    pub fn lock_for(&self, key: &LogicalKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    /// Run `f` while holding the lock for `key`.
    pub fn with_lock<T>(&self, key: &LogicalKey, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(key);
        let _guard: MutexGuard<'_, ()> = lock.lock().unwrap_or_else(|e| e.into_inner());
        f()
    }

    /// Number of keys seen so far.
    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
