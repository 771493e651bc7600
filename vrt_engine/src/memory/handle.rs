//! Shared-ownership handle to a managed resource.
//!
//! Cloning a handle grabs the resource, dropping it releases. Every handle
//! owns exactly one reference, so a resource can never be released more
//! times than it was grabbed. The last drop unregisters the key; the
//! payload itself lives until its manager is flushed.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use super::deferred_pool::SlotId;
use super::key_strategy::ResourceKey;
use super::manager::ManagerShared;

pub struct Handle<T, K: ResourceKey = u32> {
    owner: Rc<ManagerShared<T, K>>,
    slot: SlotId,
    resource: Rc<T>,
}

impl<T, K: ResourceKey> Handle<T, K> {
    /// Wrap a reference the manager already counted (no grab)
    pub(crate) fn from_parts(owner: Rc<ManagerShared<T, K>>, slot: SlotId, resource: Rc<T>) -> Self {
        Self { owner, slot, resource }
    }

    /// Add an owner. Same as `clone`.
    pub fn grab(&self) -> Self {
        self.clone()
    }

    /// Give up this owner's reference. Same as dropping the handle.
    pub fn release(self) {
        drop(self);
    }

    /// Current number of owners, 0 once the manager was cleared
    pub fn use_count(&self) -> u32 {
        self.owner.use_count(self.slot)
    }

    /// Key the resource is registered under, None once the manager was cleared
    pub fn key(&self) -> Option<K> {
        self.owner.key(self.slot)
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Whether the resource still belongs to its manager
    pub fn is_registered(&self) -> bool {
        self.owner.is_registered(self.slot)
    }

    pub fn manager_name(&self) -> &str {
        self.owner.name()
    }

    /// Whether both handles refer to the same resource
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.resource, &b.resource)
    }
}

impl<T, K: ResourceKey> Clone for Handle<T, K> {
    fn clone(&self) -> Self {
        self.owner.grab(self.slot);
        Self {
            owner: Rc::clone(&self.owner),
            slot: self.slot,
            resource: Rc::clone(&self.resource),
        }
    }
}

impl<T, K: ResourceKey> Drop for Handle<T, K> {
    fn drop(&mut self) {
        self.owner.release(self.slot);
    }
}

impl<T, K: ResourceKey> Deref for Handle<T, K> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.resource
    }
}

impl<T, K: ResourceKey> fmt::Debug for Handle<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("manager", &self.owner.name())
            .field("slot", &self.slot.index())
            .field("key", &self.key())
            .field("use_count", &self.use_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
