//! Key -> slot lookup table of one manager.
//!
//! Keys are unique: `manage` refuses a key that is already registered and
//! leaves the table untouched. A resource is registered from creation until
//! its use count crosses zero, at which point `suicide` removes the key in
//! the same step, so a later lookup reports "not found".

use rustc_hash::FxHashMap;
use std::hash::Hash;
use super::deferred_pool::SlotId;

/// Directory of registered resources, keyed by `K`
pub struct Directory<K> {
    entries: FxHashMap<K, SlotId>,
}

impl<K: Eq + Hash> Directory<K> {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Register `slot` under `key`.
    ///
    /// Returns false, without any mutation, if `key` is already taken.
    pub fn manage(&mut self, key: K, slot: SlotId) -> bool {
        match self.entries.entry(key) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(vacant) => {
                vacant.insert(slot);
                true
            }
        }
    }

    /// Unregister `key` at its zero-crossing.
    ///
    /// Returns the slot that was registered, which the owner then hands to
    /// its pool's deferred free.
    pub fn suicide(&mut self, key: &K) -> Option<SlotId> {
        self.entries.remove(key)
    }

    /// Slot registered under `key`
    pub fn lookup(&self, key: &K) -> Option<SlotId> {
        self.entries.get(key).copied()
    }

    /// Whether `key` is registered
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of registered keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    /// Unregister everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Eq + Hash> Default for Directory<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
