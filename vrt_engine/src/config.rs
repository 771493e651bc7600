//! Engine configuration
//!
//! Plain structs with sensible defaults. The active configuration is stored by
//! `Engine::initialize` and read back through `Engine::config`.

use crate::error::{Error, Result};

/// Default number of slots in one pool block
pub const DEFAULT_BLOCK_SIZE: usize = 16;

/// Pool sizing for resource managers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Number of slots allocated together when a pool grows
    pub block_size: usize,
    /// Blocks allocated up front by every manager (warm-up)
    pub warm_blocks: usize,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            warm_blocks: 0,
        }
    }
}

impl ResourceConfig {
    /// Set the block size
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the number of blocks reserved at manager creation
    pub fn with_warm_blocks(mut self, warm_blocks: usize) -> Self {
        self.warm_blocks = warm_blocks;
        self
    }

    /// Check the values are usable
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` when the block size is zero or does not
    /// fit the 32-bit slot index space.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be greater than 0".to_string()));
        }
        if u32::try_from(self.block_size).is_err() {
            return Err(Error::InvalidConfig(format!(
                "block_size {} exceeds the slot index range", self.block_size
            )));
        }
        Ok(())
    }
}

/// Frame pacing settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Timeout passed to every frame fence wait, in nanoseconds
    pub fence_timeout_ns: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fence_timeout_ns: u64::MAX,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub resources: ResourceConfig,
    pub frame: FrameConfig,
}

impl EngineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.resources.validate()?;
        if self.frame.fence_timeout_ns == 0 {
            return Err(Error::InvalidConfig("fence_timeout_ns must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
