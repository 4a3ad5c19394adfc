//! Time-boxed re-entrancy lock.
//!
//! Writing an attribute makes the host emit another `update` for the same
//! node. Keys stay locked for `ttl_ms` after processing so that echo is
//! dropped instead of re-applied. Keys are node ids.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct UpdateLock {
    ttl_ms: f64,
    /// Key → time at which it unlocks.
    entries: HashMap<String, f64>,
}

impl UpdateLock {
    pub fn new(ttl_ms: f64) -> Self {
        Self {
            ttl_ms,
            entries: HashMap::new(),
        }
    }

    pub fn ttl_ms(&self) -> f64 {
        self.ttl_ms
    }

    pub fn is_locked(&self, key: &str, now_ms: f64) -> bool {
        self.entries.get(key).is_some_and(|until| now_ms < *until)
    }

    /// Lock `key` until `now_ms + ttl`. Returns `false` (and changes nothing)
    /// if it is already locked.
    pub fn try_acquire(&mut self, key: &str, now_ms: f64) -> bool {
        if self.is_locked(key, now_ms) {
            return false;
        }
        self.entries.insert(key.to_string(), now_ms + self.ttl_ms);
        true
    }

    /// Drop expired entries.
    pub fn purge(&mut self, now_ms: f64) {
        self.entries.retain(|_, until| now_ms < *until);
    }

    /// Earliest pending release, if any.
    pub fn next_release(&self) -> Option<f64> {
        self.entries.values().copied().reduce(f64::min)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
