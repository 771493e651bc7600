//! Key policies for resource managers.
//!
//! A manager either takes keys from its caller (names of materials, scenes)
//! or hands out its own monotonically increasing indices (primitives, models).

use std::fmt;
use std::hash::Hash;
use crate::error::{Error, Result};

/// Key type usable in a `Manager` directory
pub trait ResourceKey: Eq + Hash + Clone + fmt::Debug + 'static {
    /// Build a key from an auto-assigned index
    fn from_auto_index(index: u32) -> Self;
}

impl ResourceKey for u32 {
    fn from_auto_index(index: u32) -> Self {
        index
    }
}

impl ResourceKey for u64 {
    fn from_auto_index(index: u32) -> Self {
        u64::from(index)
    }
}

impl ResourceKey for usize {
    fn from_auto_index(index: u32) -> Self {
        index as usize
    }
}

impl ResourceKey for String {
    fn from_auto_index(index: u32) -> Self {
        index.to_string()
    }
}

/// How a manager obtains the key of a new resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// The caller supplies a unique key
    Explicit,
    /// The manager assigns 0, 1, 2, ... in creation order
    AutoIndex { next: u32 },
}

impl KeyStrategy {
    /// Auto-indexing strategy starting at 0
    pub fn auto_index() -> Self {
        KeyStrategy::AutoIndex { next: 0 }
    }

    /// Key for the next resource, without consuming it
    ///
    /// # Errors
    ///
    /// `Error::KeyStrategyMismatch` if an explicit key is given to an
    /// auto-indexed manager or none is given to an explicit one.
    pub fn resolve<K: ResourceKey>(&self, explicit: Option<K>) -> Result<K> {
        match (self, explicit) {
            (KeyStrategy::Explicit, Some(key)) => Ok(key),
            (KeyStrategy::Explicit, None) => Err(Error::KeyStrategyMismatch(
                "manager requires an explicit key".to_string(),
            )),
            (KeyStrategy::AutoIndex { next }, None) => Ok(K::from_auto_index(*next)),
            (KeyStrategy::AutoIndex { .. }, Some(key)) => Err(Error::KeyStrategyMismatch(format!(
                "manager is auto-indexed, got explicit key {:?}", key
            ))),
        }
    }

    /// Consume the key returned by the last `resolve` once it is registered
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` when the auto-index space is exhausted.
    pub fn commit(&mut self) -> Result<()> {
        if let KeyStrategy::AutoIndex { next } = self {
            *next = next.checked_add(1).ok_or(Error::OutOfMemory)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "key_strategy_tests.rs"]
mod tests;
