//! Graphics device module - the GPU collaborator behind resource destructors

pub mod graphics_device;
pub mod buffer;
pub mod acceleration_structure;

// Mock graphics device (no GPU required), also used by integration tests
pub mod mock_graphics_device;

pub use graphics_device::*;
pub use buffer::*;
pub use acceleration_structure::*;
