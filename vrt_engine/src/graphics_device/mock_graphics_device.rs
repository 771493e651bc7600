//! Mock graphics device and frame fence (no GPU required)
//!
//! Tracks every created object in slot maps so tests can check that resource
//! destructors release exactly what they created, in which order, and only once.

use slotmap::SlotMap;

use crate::engine_bail;
use crate::error::{Error, Result};
use crate::graphics_device::{
    AccelerationStructureDesc, AccelerationStructureKey, BufferDesc, BufferKey, GraphicsDevice,
    ShaderModuleDesc, ShaderModuleKey,
};
use crate::memory::FrameFence;

/// First fake device address handed out
const BASE_DEVICE_ADDRESS: u64 = 0x1_0000;

/// Fake device addresses are aligned like real acceleration structure storage
const DEVICE_ADDRESS_ALIGNMENT: u64 = 256;

// ============================================================================
// Mock objects
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub desc: BufferDesc,
    pub data: Vec<u8>,
    pub address: u64,
}

#[derive(Debug)]
pub struct MockAccelerationStructure {
    pub desc: AccelerationStructureDesc,
    pub address: u64,
}

/// Object passed to a `destroy_*` call, in call order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockObject {
    Buffer(BufferKey),
    ShaderModule(ShaderModuleKey),
    AccelerationStructure(AccelerationStructureKey),
}

/// Creation and destruction counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockDeviceStats {
    pub buffers_created: u32,
    pub buffers_destroyed: u32,
    pub shader_modules_created: u32,
    pub shader_modules_destroyed: u32,
    pub acceleration_structures_created: u32,
    pub acceleration_structures_destroyed: u32,
    /// Destroy calls on unknown or already destroyed objects
    pub invalid_destroys: u32,
    pub wait_idle_calls: u32,
}

// ============================================================================
// MockGraphicsDevice
// ============================================================================

#[derive(Debug)]
pub struct MockGraphicsDevice {
    buffers: SlotMap<BufferKey, MockBuffer>,
    shader_modules: SlotMap<ShaderModuleKey, ShaderModuleDesc>,
    acceleration_structures: SlotMap<AccelerationStructureKey, MockAccelerationStructure>,
    destroyed: Vec<MockObject>,
    stats: MockDeviceStats,
    next_address: u64,
    out_of_memory: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            buffers: SlotMap::with_key(),
            shader_modules: SlotMap::with_key(),
            acceleration_structures: SlotMap::with_key(),
            destroyed: Vec::new(),
            stats: MockDeviceStats::default(),
            next_address: BASE_DEVICE_ADDRESS,
            out_of_memory: false,
        }
    }

    /// Make every subsequent creation fail with `Error::OutOfMemory`
    pub fn set_out_of_memory(&mut self, out_of_memory: bool) {
        self.out_of_memory = out_of_memory;
    }

    pub fn stats(&self) -> MockDeviceStats {
        self.stats
    }

    /// Destroyed objects, oldest first
    pub fn destroyed(&self) -> &[MockObject] {
        &self.destroyed
    }

    pub fn buffer(&self, key: BufferKey) -> Option<&MockBuffer> {
        self.buffers.get(key)
    }

    pub fn shader_module(&self, key: ShaderModuleKey) -> Option<&ShaderModuleDesc> {
        self.shader_modules.get(key)
    }

    pub fn acceleration_structure(&self, key: AccelerationStructureKey) -> Option<&MockAccelerationStructure> {
        self.acceleration_structures.get(key)
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_shader_module_count(&self) -> usize {
        self.shader_modules.len()
    }

    pub fn live_acceleration_structure_count(&self) -> usize {
        self.acceleration_structures.len()
    }

    /// Objects created and not destroyed yet
    pub fn live_object_count(&self) -> usize {
        self.buffers.len() + self.shader_modules.len() + self.acceleration_structures.len()
    }

    fn check_memory(&self) -> Result<()> {
        if self.out_of_memory {
            return Err(Error::OutOfMemory);
        }
        Ok(())
    }

    fn allocate_address(&mut self, size: u64) -> u64 {
        let address = self.next_address;
        let span = size.max(1).div_ceil(DEVICE_ADDRESS_ALIGNMENT) * DEVICE_ADDRESS_ALIGNMENT;
        self.next_address += span;
        address
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<BufferKey> {
        self.check_memory()?;
        if desc.size == 0 {
            engine_bail!("vrt::MockGraphicsDevice", "Cannot create an empty buffer");
        }

        let address = self.allocate_address(desc.size);
        let key = self.buffers.insert(MockBuffer {
            desc: desc.clone(),
            data: vec![0; desc.size as usize],
            address,
        });
        self.stats.buffers_created += 1;
        Ok(key)
    }

    fn write_buffer(&mut self, buffer: BufferKey, offset: u64, data: &[u8]) -> Result<()> {
        let Some(target) = self.buffers.get_mut(buffer) else {
            engine_bail!("vrt::MockGraphicsDevice", "write_buffer: unknown buffer {:?}", buffer);
        };

        let start = offset as usize;
        let end = start + data.len();
        if end > target.data.len() {
            engine_bail!("vrt::MockGraphicsDevice",
                "write_buffer: range {}..{} exceeds buffer size {}", start, end, target.data.len());
        }

        target.data[start..end].copy_from_slice(data);
        Ok(())
    }

    fn buffer_device_address(&self, buffer: BufferKey) -> Result<u64> {
        match self.buffers.get(buffer) {
            Some(target) => Ok(target.address),
            None => Err(Error::InvalidResource(format!("Unknown buffer {:?}", buffer))),
        }
    }

    fn destroy_buffer(&mut self, buffer: BufferKey) {
        if self.buffers.remove(buffer).is_some() {
            self.stats.buffers_destroyed += 1;
        } else {
            self.stats.invalid_destroys += 1;
        }
        self.destroyed.push(MockObject::Buffer(buffer));
    }

    fn create_shader_module(&mut self, desc: &ShaderModuleDesc) -> Result<ShaderModuleKey> {
        self.check_memory()?;
        let key = self.shader_modules.insert(desc.clone());
        self.stats.shader_modules_created += 1;
        Ok(key)
    }

    fn destroy_shader_module(&mut self, module: ShaderModuleKey) {
        if self.shader_modules.remove(module).is_some() {
            self.stats.shader_modules_destroyed += 1;
        } else {
            self.stats.invalid_destroys += 1;
        }
        self.destroyed.push(MockObject::ShaderModule(module));
    }

    fn create_acceleration_structure(
        &mut self,
        desc: &AccelerationStructureDesc,
    ) -> Result<AccelerationStructureKey> {
        self.check_memory()?;
        if desc.primitive_count() == 0 {
            engine_bail!("vrt::MockGraphicsDevice", "Cannot build an empty acceleration structure");
        }

        // 64 bytes per primitive is close enough for fake addresses
        let address = self.allocate_address(desc.primitive_count() * 64);
        let key = self.acceleration_structures.insert(MockAccelerationStructure {
            desc: desc.clone(),
            address,
        });
        self.stats.acceleration_structures_created += 1;
        Ok(key)
    }

    fn acceleration_structure_device_address(&self, structure: AccelerationStructureKey) -> Result<u64> {
        match self.acceleration_structures.get(structure) {
            Some(target) => Ok(target.address),
            None => Err(Error::InvalidResource(format!("Unknown acceleration structure {:?}", structure))),
        }
    }

    fn destroy_acceleration_structure(&mut self, structure: AccelerationStructureKey) {
        if self.acceleration_structures.remove(structure).is_some() {
            self.stats.acceleration_structures_destroyed += 1;
        } else {
            self.stats.invalid_destroys += 1;
        }
        self.destroyed.push(MockObject::AccelerationStructure(structure));
    }

    fn wait_idle(&mut self) -> Result<()> {
        self.stats.wait_idle_calls += 1;
        Ok(())
    }
}

// ============================================================================
// MockFence
// ============================================================================

/// Frame fence that is always signaled, unless told to fail
#[derive(Debug, Default)]
pub struct MockFence {
    pub waits: u32,
    pub resets: u32,
    pub fail: bool,
}

impl MockFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fence whose waits time out
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

impl FrameFence for MockFence {
    fn wait(&mut self, timeout_ns: u64) -> Result<()> {
        self.waits += 1;
        if self.fail {
            return Err(Error::FenceWaitFailed(format!("mock fence timed out after {} ns", timeout_ns)));
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.resets += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
