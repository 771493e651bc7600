//! Buffer and shader module descriptors

use bitflags::bitflags;

bitflags! {
    /// Buffer usage flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Destination of transfer/upload commands
        const TRANSFER_DST = 1 << 0;
        /// Plain storage buffer
        const STORAGE = 1 << 1;
        /// Can be queried for a device address
        const DEVICE_ADDRESS = 1 << 2;
        /// Read-only input to an acceleration structure build (vertices, indices, instances)
        const ACCELERATION_STRUCTURE_BUILD_INPUT = 1 << 3;
        /// Backing storage of an acceleration structure
        const ACCELERATION_STRUCTURE_STORAGE = 1 << 4;
        /// Shader binding table
        const SHADER_BINDING_TABLE = 1 << 5;
        /// Uniform buffer
        const UNIFORM = 1 << 6;
    }
}

impl BufferUsage {
    /// Usage of vertex and index buffers feeding a BLAS build
    pub fn geometry_input() -> Self {
        BufferUsage::TRANSFER_DST
            | BufferUsage::DEVICE_ADDRESS
            | BufferUsage::ACCELERATION_STRUCTURE_BUILD_INPUT
    }
}

/// Where the buffer memory lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryLocation {
    /// Device local, written through staging uploads
    GpuOnly,
    /// Host visible and coherent, written directly by the CPU
    CpuToGpu,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
    /// Memory placement
    pub location: MemoryLocation,
}

/// Ray tracing shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    RayGeneration,
    Miss,
    ClosestHit,
}

/// Descriptor for creating a shader module
#[derive(Debug, Clone)]
pub struct ShaderModuleDesc {
    /// Source name the module was compiled from
    pub name: String,
    /// Entry point function
    pub entry_point: String,
    /// Pipeline stage
    pub stage: ShaderStage,
}
