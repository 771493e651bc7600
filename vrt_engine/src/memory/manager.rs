//! Generic resource manager: a deferred pool plus a key directory.
//!
//! `create_resource` stores the payload in a pool slot, registers its key
//! and returns a `Handle` holding the creator's reference. When the last
//! handle goes away the key is unregistered and the slot is queued for
//! deletion; the payload's `Drop` only runs in `flush_free`, which needs a
//! `FrameComplete` token.
//!
//! ```
//! use vrt_engine::vrt::memory::Manager;
//!
//! let materials = Manager::<&str, String>::keyed("materials")?;
//! let cow = materials.create_keyed("Cow".to_string(), "lambert")?;
//! assert!(materials.create_keyed("Cow".to_string(), "phong").is_err());
//! assert_eq!(*cow, "lambert");
//!
//! drop(cow);
//! assert!(!materials.contains(&"Cow".to_string()));
//! assert_eq!(materials.pending_count(), 1);
//! # Ok::<(), vrt_engine::vrt::Error>(())
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ResourceConfig;
use crate::engine::Engine;
use crate::error::{Error, Result};
use super::deferred_pool::{DeferredPool, SlotId};
use super::directory::Directory;
use super::frame_sync::FrameComplete;
use super::handle::Handle;
use super::key_strategy::{KeyStrategy, ResourceKey};
use super::resource::{ReleaseOutcome, ResourceEntry};

/// Snapshot of a manager's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerStats {
    /// Registered resources (use count > 0)
    pub live: usize,
    /// Released resources waiting for `flush_free`
    pub pending: usize,
    pub blocks: usize,
    pub capacity: usize,
    /// Resources created since the manager was built
    pub created: u64,
    /// Resources destroyed by flushes and clears
    pub destroyed: u64,
}

pub(crate) struct ManagerState<T, K> {
    pool: DeferredPool<ResourceEntry<T, K>>,
    directory: Directory<K>,
    keys: KeyStrategy,
    created: u64,
    destroyed: u64,
}

/// State shared between a manager and the handles it gave out
pub(crate) struct ManagerShared<T, K> {
    name: String,
    state: RefCell<ManagerState<T, K>>,
}

impl<T, K: ResourceKey> ManagerShared<T, K> {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Add one owner to the resource in `slot`. Returns the new use count,
    /// 0 when the slot no longer belongs to this manager.
    pub(crate) fn grab(&self, slot: SlotId) -> u32 {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            crate::engine_error!("vrt::Manager", "{}: grab while the manager is busy", self.name);
            return 0;
        };

        match state.pool.get_mut(slot) {
            Some(entry) => entry.grab(),
            None => {
                crate::engine_debug!("vrt::Manager",
                    "{}: grab of detached slot {} ignored", self.name, slot.index());
                0
            }
        }
    }

    /// Drop one owner of the resource in `slot`.
    ///
    /// At the zero-crossing the key is unregistered and the slot is moved
    /// to the pending-delete queue. The payload is not dropped here.
    pub(crate) fn release(&self, slot: SlotId) -> ReleaseOutcome {
        let Ok(mut guard) = self.state.try_borrow_mut() else {
            crate::engine_error!("vrt::Manager", "{}: release while the manager is busy", self.name);
            return ReleaseOutcome::Alive(0);
        };
        let state = &mut *guard;

        let Some(entry) = state.pool.get_mut(slot) else {
            crate::engine_debug!("vrt::Manager",
                "{}: release of detached slot {} ignored", self.name, slot.index());
            return ReleaseOutcome::Alive(0);
        };

        let outcome = entry.release();
        if outcome == ReleaseOutcome::ZeroCrossing {
            let key = entry.key().clone();
            let removed = state.directory.suicide(&key);
            debug_assert_eq!(removed, Some(slot), "directory out of sync for {:?}", key);
            state.pool.free(slot);

            crate::engine_trace!("vrt::Manager",
                "{}: {:?} released, slot {} pending delete", self.name, key, slot.index());
        }
        outcome
    }

    pub(crate) fn use_count(&self, slot: SlotId) -> u32 {
        self.state.try_borrow()
            .ok()
            .and_then(|state| state.pool.get(slot).map(ResourceEntry::use_count))
            .unwrap_or(0)
    }

    pub(crate) fn key(&self, slot: SlotId) -> Option<K> {
        let state = self.state.try_borrow().ok()?;
        state.pool.get(slot).map(|entry| entry.key().clone())
    }

    pub(crate) fn is_registered(&self, slot: SlotId) -> bool {
        self.state.try_borrow()
            .map(|state| state.pool.get(slot).is_some())
            .unwrap_or(false)
    }
}

/// Manager of one resource type `T` keyed by `K`
pub struct Manager<T, K = u32> {
    shared: Rc<ManagerShared<T, K>>,
}

impl<T, K: ResourceKey> Manager<T, K> {
    /// Create a manager sized from the engine configuration
    pub fn new(name: impl Into<String>, keys: KeyStrategy) -> Result<Self> {
        Self::with_config(name, keys, &Engine::config().resources)
    }

    /// Manager whose callers supply unique keys
    pub fn keyed(name: impl Into<String>) -> Result<Self> {
        Self::new(name, KeyStrategy::Explicit)
    }

    /// Manager assigning keys 0, 1, 2, ... in creation order
    pub fn auto_indexed(name: impl Into<String>) -> Result<Self> {
        Self::new(name, KeyStrategy::auto_index())
    }

    /// Create a manager with explicit pool sizing
    ///
    /// # Errors
    ///
    /// `Error::InvalidConfig` for an unusable block size, `Error::OutOfMemory`
    /// if the warm-up blocks do not fit the slot index range.
    pub fn with_config(name: impl Into<String>, keys: KeyStrategy, config: &ResourceConfig) -> Result<Self> {
        let name = name.into();
        let pool = DeferredPool::from_config(config)?;

        crate::engine_debug!("vrt::Manager",
            "Created manager '{}' ({:?}, block size {}, {} warm blocks)",
            name, keys, config.block_size, config.warm_blocks);

        Ok(Self {
            shared: Rc::new(ManagerShared {
                name,
                state: RefCell::new(ManagerState {
                    pool,
                    directory: Directory::new(),
                    keys,
                    created: 0,
                    destroyed: 0,
                }),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn key_strategy(&self) -> KeyStrategy {
        self.shared.state.borrow().keys
    }

    /// Create a resource under the next auto-assigned key
    pub fn create(&self, resource: T) -> Result<Handle<T, K>> {
        self.create_resource(None, resource)
    }

    /// Create a resource under a caller-supplied key
    pub fn create_keyed(&self, key: K, resource: T) -> Result<Handle<T, K>> {
        self.create_resource(Some(key), resource)
    }

    /// Store `resource`, register it and return the creator's handle (use count 1).
    ///
    /// # Errors
    ///
    /// - `Error::DuplicateKey` if the key is taken. Nothing is registered and
    ///   the existing resource is untouched.
    /// - `Error::KeyStrategyMismatch` if `key` does not match the manager's strategy.
    /// - `Error::OutOfMemory` once the slot or auto-index space is exhausted.
    ///
    /// On error `resource` is dropped immediately.
    pub fn create_resource(&self, key: Option<K>, resource: T) -> Result<Handle<T, K>> {
        let mut keys = self.key_strategy();
        let key = keys.resolve(key)?;
        keys.commit()?;

        let entry = ResourceEntry::new(resource, key.clone());
        // Keeps the payload alive until after the state borrow ends, whatever happens
        let payload = Rc::clone(entry.resource());

        let mut guard = self.shared.state.borrow_mut();
        let state = &mut *guard;

        if state.directory.contains(&key) {
            crate::engine_warn!("vrt::Manager",
                "{}: key {:?} is already registered", self.shared.name, key);
            return Err(Error::DuplicateKey(format!("{:?} in manager '{}'", key, self.shared.name)));
        }

        let slot = state.pool.alloc(entry)?;
        let managed = state.directory.manage(key.clone(), slot);
        debug_assert!(managed, "key {:?} registered twice", key);
        state.keys = keys;
        state.created += 1;

        crate::engine_trace!("vrt::Manager",
            "{}: created {:?} in slot {}", self.shared.name, key, slot.index());
        drop(guard);

        Ok(Handle::from_parts(Rc::clone(&self.shared), slot, payload))
    }

    /// Handle to the resource registered under `key`, adding one owner
    pub fn find(&self, key: &K) -> Option<Handle<T, K>> {
        let mut guard = self.shared.state.borrow_mut();
        let state = &mut *guard;

        let slot = state.directory.lookup(key)?;
        let entry = state.pool.get_mut(slot)?;
        entry.grab();
        let payload = Rc::clone(entry.resource());
        drop(guard);

        Some(Handle::from_parts(Rc::clone(&self.shared), slot, payload))
    }

    /// Whether a resource is registered under `key` (use count > 0)
    pub fn contains(&self, key: &K) -> bool {
        self.shared.state.borrow().directory.contains(key)
    }

    /// Use count of the resource registered under `key`, None if not registered
    pub fn use_count(&self, key: &K) -> Option<u32> {
        let state = self.shared.state.borrow();
        let slot = state.directory.lookup(key)?;
        state.pool.get(slot).map(ResourceEntry::use_count)
    }

    /// Registered keys in slot order
    pub fn keys(&self) -> Vec<K> {
        self.shared.state.borrow()
            .pool
            .iter()
            .map(|(_, entry)| entry.key().clone())
            .collect()
    }

    /// Number of registered resources
    pub fn live_count(&self) -> usize {
        self.shared.state.borrow().pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }

    /// Number of released resources waiting for `flush_free`
    pub fn pending_count(&self) -> usize {
        self.shared.state.borrow().pool.pending_len()
    }

    pub fn block_count(&self) -> usize {
        self.shared.state.borrow().pool.block_count()
    }

    pub fn capacity(&self) -> usize {
        self.shared.state.borrow().pool.capacity()
    }

    pub fn stats(&self) -> ManagerStats {
        let state = self.shared.state.borrow();
        ManagerStats {
            live: state.pool.len(),
            pending: state.pool.pending_len(),
            blocks: state.pool.block_count(),
            capacity: state.pool.capacity(),
            created: state.created,
            destroyed: state.destroyed,
        }
    }

    /// Destroy every released resource, in release order.
    ///
    /// Payload destructors run after the manager state is unborrowed, so they
    /// may release handles into any manager. Releases into this one are
    /// destroyed on the next flush.
    pub fn flush_free(&self, complete: &FrameComplete<'_>) -> usize {
        let dead = {
            let mut state = self.shared.state.borrow_mut();
            let dead = state.pool.take_pending();
            state.destroyed += dead.len() as u64;
            dead
        };

        let count = dead.len();
        if count > 0 {
            crate::engine_debug!("vrt::Manager",
                "{}: destroying {} resources after frame {}", self.shared.name, count, complete.frame_index());
        }

        for (_, entry) in dead {
            drop(entry);
        }
        count
    }

    /// Destroy every resource, released or not, and release all pool blocks.
    ///
    /// Handles still alive afterwards are detached: they keep their payload
    /// alive and their release does nothing. Returns the number of entries
    /// removed from the pool.
    pub fn clear(&self, complete: &FrameComplete<'_>) -> usize {
        let entries = {
            let mut state = self.shared.state.borrow_mut();
            state.directory.clear();
            let entries = state.pool.drain();
            state.destroyed += entries.len() as u64;
            entries
        };

        let count = entries.len();
        crate::engine_debug!("vrt::Manager",
            "{}: cleared {} resources after frame {}", self.shared.name, count, complete.frame_index());
        drop(entries);
        count
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
