//! Block pool allocator with deferred destruction.
//!
//! Values live in fixed-size blocks of slots. A block is never moved or
//! released until the pool is cleared, so the address of a live value stays
//! the same for its whole lifetime, even when the pool grows.
//!
//! Each slot is in exactly one state:
//! - `Free`: on the free stack, ready for `alloc`
//! - `Live`: holds a value handed out by `alloc`
//! - `PendingDelete`: logically dead, value NOT dropped yet
//!
//! `free` only moves a slot to the pending queue. The value is dropped (or
//! handed to an `on_free` hook) by `flush_free`, in release order.
//!
//! # Example
//!
//! ```
//! use vrt_engine::vrt::memory::DeferredPool;
//!
//! let mut pool = DeferredPool::with_block_size(4);
//! let id = pool.alloc("blas")?;
//! assert!(pool.free(id));
//! assert_eq!(pool.pending_len(), 1);  // still alive
//! assert_eq!(pool.flush_free(), 1);   // dropped here
//! assert!(pool.get(id).is_none());
//! # Ok::<(), vrt_engine::vrt::Error>(())
//! ```

use crate::config::{ResourceConfig, DEFAULT_BLOCK_SIZE};
use crate::error::{Error, Result};

/// Stable identifier of a pool slot.
///
/// The generation is bumped every time the slot is flushed, so an id taken
/// before a flush never resolves to the value that reuses the slot later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    index: u32,
    generation: u32,
}

impl SlotId {
    /// Flat slot index (block * block_size + offset)
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Observable slot state, as reported by `DeferredPool::status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Free,
    Live,
    PendingDelete,
}

enum SlotState<T> {
    Free,
    Live(T),
    PendingDelete(T),
}

struct Slot<T> {
    generation: u32,
    state: SlotState<T>,
}

/// Pool allocator with a deferred-delete queue
pub struct DeferredPool<T> {
    /// Boxed blocks: the Vec may reallocate, the slots inside never move
    blocks: Vec<Box<[Slot<T>]>>,
    block_size: usize,
    /// Free slot indices (stack)
    free_list: Vec<u32>,
    /// Released slot indices, in release order
    pending: Vec<u32>,
    live: usize,
    /// Generation given to slots of newly added blocks
    generation_floor: u32,
}

impl<T> DeferredPool<T> {
    /// Create an empty pool with the default block size (16)
    pub fn new() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    /// Create an empty pool growing by `block_size` slots at a time
    pub fn with_block_size(block_size: usize) -> Self {
        debug_assert!(block_size > 0, "block size must be greater than 0");
        Self {
            blocks: Vec::new(),
            block_size: block_size.max(1),
            free_list: Vec::new(),
            pending: Vec::new(),
            live: 0,
            generation_floor: 0,
        }
    }

    /// Create a pool from configuration and reserve its warm-up blocks
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for an unusable block size, or
    /// `Error::OutOfMemory` if the warm-up exceeds the slot index range.
    pub fn from_config(config: &ResourceConfig) -> Result<Self> {
        config.validate()?;
        let mut pool = Self::with_block_size(config.block_size);
        pool.reserve_blocks(config.warm_blocks)?;
        Ok(pool)
    }

    /// Grow the pool by `count` blocks up front
    pub fn reserve_blocks(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.add_block()?;
        }
        Ok(())
    }

    fn add_block(&mut self) -> Result<()> {
        let first = self.blocks.len() * self.block_size;
        let end = first + self.block_size;
        // Every index of the new block must fit in a u32
        let end = u32::try_from(end).map_err(|_| Error::OutOfMemory)?;
        let first = end - self.block_size as u32;

        let floor = self.generation_floor;
        let block: Box<[Slot<T>]> = (0..self.block_size)
            .map(|_| Slot { generation: floor, state: SlotState::Free })
            .collect();
        self.blocks.push(block);

        // Reversed so the lowest index is popped first
        self.free_list.extend((first..end).rev());

        crate::engine_trace!("vrt::DeferredPool",
            "Added block {} (slots {}..{})", self.blocks.len() - 1, first, end);
        Ok(())
    }

    fn slot(&self, index: u32) -> Option<&Slot<T>> {
        let index = index as usize;
        self.blocks.get(index / self.block_size)?.get(index % self.block_size)
    }

    fn slot_mut(&mut self, index: u32) -> Option<&mut Slot<T>> {
        let index = index as usize;
        let block_size = self.block_size;
        self.blocks.get_mut(index / block_size)?.get_mut(index % block_size)
    }

    fn checked_slot(&self, id: SlotId) -> Option<&Slot<T>> {
        self.slot(id.index).filter(|slot| slot.generation == id.generation)
    }

    fn checked_slot_mut(&mut self, id: SlotId) -> Option<&mut Slot<T>> {
        self.slot_mut(id.index).filter(|slot| slot.generation == id.generation)
    }

    /// Store `value` in a free slot, growing by one block if none is free
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` once the 32-bit slot index space is
    /// exhausted. Callers treat it as unrecoverable.
    pub fn alloc(&mut self, value: T) -> Result<SlotId> {
        if self.free_list.is_empty() {
            self.add_block()?;
        }

        let index = self.free_list.pop().ok_or(Error::OutOfMemory)?;
        let slot = self.slot_mut(index).ok_or(Error::OutOfMemory)?;
        debug_assert!(matches!(slot.state, SlotState::Free), "slot {} on free list is not free", index);

        slot.state = SlotState::Live(value);
        let id = SlotId { index, generation: slot.generation };
        self.live += 1;
        Ok(id)
    }

    /// Move a live slot to the pending-delete queue without dropping its value
    ///
    /// Returns false (and changes nothing) if `id` is stale or not live.
    pub fn free(&mut self, id: SlotId) -> bool {
        let Some(slot) = self.checked_slot_mut(id) else {
            return false;
        };

        match std::mem::replace(&mut slot.state, SlotState::Free) {
            SlotState::Live(value) => {
                slot.state = SlotState::PendingDelete(value);
            }
            other => {
                slot.state = other;
                return false;
            }
        }

        self.live -= 1;
        self.pending.push(id.index);
        true
    }

    /// Take every pending value out of the pool, in release order.
    ///
    /// The slots go back to the free stack with a bumped generation. The
    /// values are returned so the caller decides where they get dropped.
    pub fn take_pending(&mut self) -> Vec<(SlotId, T)> {
        let pending = std::mem::take(&mut self.pending);
        let mut values = Vec::with_capacity(pending.len());

        for index in pending {
            let Some(slot) = self.slot_mut(index) else {
                continue;
            };
            if let SlotState::PendingDelete(value) = std::mem::replace(&mut slot.state, SlotState::Free) {
                let id = SlotId { index, generation: slot.generation };
                slot.generation = slot.generation.wrapping_add(1);
                values.push((id, value));
                self.free_list.push(index);
            }
        }

        values
    }

    /// Run `on_free` for every pending value, in release order
    ///
    /// Returns the number of values handed to the hook. An empty pending
    /// queue makes this a no-op.
    pub fn flush_free_with<F>(&mut self, mut on_free: F) -> usize
    where
        F: FnMut(SlotId, T),
    {
        let dead = self.take_pending();
        let count = dead.len();
        for (id, value) in dead {
            on_free(id, value);
        }
        count
    }

    /// Drop every pending value, in release order. Returns how many were dropped.
    pub fn flush_free(&mut self) -> usize {
        self.flush_free_with(|_, value| drop(value))
    }

    /// Empty the pool and release all blocks.
    ///
    /// Returns pending values first (release order), then live values
    /// (slot order). Ids issued before the drain never resolve again.
    pub fn drain(&mut self) -> Vec<T> {
        let mut values: Vec<T> = self.take_pending()
            .into_iter()
            .map(|(_, value)| value)
            .collect();

        let mut max_generation = self.generation_floor;
        for block in self.blocks.drain(..) {
            for slot in block.into_vec() {
                max_generation = max_generation.max(slot.generation);
                if let SlotState::Live(value) = slot.state {
                    values.push(value);
                }
            }
        }

        self.generation_floor = max_generation.wrapping_add(1);
        self.free_list.clear();
        self.live = 0;
        values
    }

    /// Flush, drop every live value and release all blocks (full shutdown)
    pub fn clear(&mut self) {
        let values = self.drain();
        crate::engine_debug!("vrt::DeferredPool", "Cleared pool, destroyed {} values", values.len());
        drop(values);
    }

    /// Live value for `id`, None if stale, pending or free
    pub fn get(&self, id: SlotId) -> Option<&T> {
        match &self.checked_slot(id)?.state {
            SlotState::Live(value) => Some(value),
            _ => None,
        }
    }

    /// Mutable live value for `id`
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match &mut self.checked_slot_mut(id)?.state {
            SlotState::Live(value) => Some(value),
            _ => None,
        }
    }

    /// State of the slot `id` refers to, None if the id is stale
    pub fn status(&self, id: SlotId) -> Option<SlotStatus> {
        Some(match self.checked_slot(id)?.state {
            SlotState::Free => SlotStatus::Free,
            SlotState::Live(_) => SlotStatus::Live,
            SlotState::PendingDelete(_) => SlotStatus::PendingDelete,
        })
    }

    /// Iterate over live values in slot order
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> + '_ {
        let block_size = self.block_size;
        self.blocks.iter().enumerate().flat_map(move |(block_index, block)| {
            block.iter().enumerate().filter_map(move |(offset, slot)| match &slot.state {
                SlotState::Live(value) => Some((
                    SlotId {
                        index: (block_index * block_size + offset) as u32,
                        generation: slot.generation,
                    },
                    value,
                )),
                _ => None,
            })
        })
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no value is live
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of values waiting for `flush_free`
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of slots ready for `alloc` without growing
    pub fn free_len(&self) -> usize {
        self.free_list.len()
    }

    /// Number of allocated blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Slots per block
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Total slots across all blocks
    pub fn capacity(&self) -> usize {
        self.blocks.len() * self.block_size
    }
}

impl<T> Default for DeferredPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Same teardown as `clear`: pending values first, then live values
impl<T> Drop for DeferredPool<T> {
    fn drop(&mut self) {
        if !self.blocks.is_empty() {
            self.clear();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "deferred_pool_tests.rs"]
mod tests;
