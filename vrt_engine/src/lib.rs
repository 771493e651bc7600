/*!
# VRT Engine

Resource lifetime management for a real-time ray tracing renderer.

GPU objects (buffers, shader modules, acceleration structures) are shared by
many owners and must outlive the GPU work that references them. Every
resource kind lives in a `Manager`: a block pool with a deferred-delete queue
plus a key directory. Owners hold `Handle`s; dropping the last one makes the
resource unreachable by key, and its destructor runs only when the manager is
flushed with a `FrameComplete` token obtained from a frame fence wait.

## Architecture

- **memory**: `DeferredPool`, `Directory`, `Manager`, `Handle`, `FrameSync`
- **graphics_device**: `GraphicsDevice` collaborator trait and its mock
- **render**: `Material`, `Primitive`, `Model`, `Scene` and `RenderResources`
- **Engine**: global logger and configuration
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod memory;
pub mod graphics_device;
pub mod render;

// Main vrt namespace module
pub mod vrt {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{EngineConfig, FrameConfig, ResourceConfig, DEFAULT_BLOCK_SIZE};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Resource lifetime sub-module
    pub mod memory {
        pub use crate::memory::*;
    }

    // Graphics device sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Ray tracing resources sub-module
    pub mod render {
        pub use crate::render::*;
    }
}

// Re-export math library at crate root
pub use glam;
