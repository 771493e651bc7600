//! Resource lifetime management: pooled storage, reference counting and
//! fence-gated deferred destruction

pub mod deferred_pool;
pub mod resource;
pub mod directory;
pub mod key_strategy;
pub mod manager;
pub mod handle;
pub mod frame_sync;

pub use deferred_pool::{DeferredPool, SlotId, SlotStatus};
pub use resource::{ResourceEntry, ReleaseOutcome};
pub use directory::Directory;
pub use key_strategy::{KeyStrategy, ResourceKey};
pub use manager::{Manager, ManagerStats};
pub use handle::Handle;
pub use frame_sync::{FrameComplete, FrameFence, FrameSync};
