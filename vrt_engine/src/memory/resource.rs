//! Reference-counted bookkeeping stored in every manager slot.
//!
//! An entry pairs the shared payload with the key it is registered under
//! and its use count. The payload is kept behind an `Rc` so handles can
//! dereference it without borrowing the manager; the slot's copy is the
//! last strong reference, which is what delays the payload's `Drop`
//! until the slot is flushed.

use std::rc::Rc;

/// Result of dropping one reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Other owners remain, with this many references
    Alive(u32),
    /// The count just went from 1 to 0
    ZeroCrossing,
}

/// Payload + key + use count of one managed resource
pub struct ResourceEntry<T, K> {
    resource: Rc<T>,
    key: K,
    use_count: u32,
}

impl<T, K> ResourceEntry<T, K> {
    /// New entry with a use count of 1 (the creator's reference)
    pub fn new(resource: T, key: K) -> Self {
        Self {
            resource: Rc::new(resource),
            key,
            use_count: 1,
        }
    }

    /// Shared payload
    pub fn resource(&self) -> &Rc<T> {
        &self.resource
    }

    /// Key the entry is registered under
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Current number of owners
    pub fn use_count(&self) -> u32 {
        self.use_count
    }

    /// Add one owner
    pub fn grab(&mut self) -> u32 {
        self.use_count += 1;
        self.use_count
    }

    /// Drop one owner.
    ///
    /// Saturates at zero: releasing an entry that already crossed zero is
    /// reported as `Alive(0)` so the caller never runs the zero-crossing twice.
    pub fn release(&mut self) -> ReleaseOutcome {
        match self.use_count {
            0 => ReleaseOutcome::Alive(0),
            1 => {
                self.use_count = 0;
                ReleaseOutcome::ZeroCrossing
            }
            count => {
                self.use_count = count - 1;
                ReleaseOutcome::Alive(count - 1)
            }
        }
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
