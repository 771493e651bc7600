//! GraphicsDevice trait - the GPU collaborator used by resource destructors

use std::cell::{RefCell, RefMut};
use std::rc::Rc;
use slotmap::new_key_type;

use crate::error::{Error, Result};
use crate::graphics_device::{BufferDesc, ShaderModuleDesc, AccelerationStructureDesc};

new_key_type! {
    /// Device buffer handle
    pub struct BufferKey;
}

new_key_type! {
    /// Device shader module handle
    pub struct ShaderModuleKey;
}

new_key_type! {
    /// Device acceleration structure handle (BLAS or TLAS)
    pub struct AccelerationStructureKey;
}

/// Shared device reference held by every GPU-backed resource.
///
/// Single-threaded: resources are created, used and flushed on the render thread.
pub type SharedDevice = Rc<RefCell<dyn GraphicsDevice>>;

/// Mutable access to a shared device
///
/// # Errors
///
/// `Error::BackendError` if the device is already borrowed further up the stack.
pub fn borrow_device(device: &SharedDevice) -> Result<RefMut<'_, dyn GraphicsDevice + 'static>> {
    device.try_borrow_mut()
        .map_err(|_| Error::BackendError("graphics device is already borrowed".to_string()))
}

/// Factory and destructor for the GPU objects owned by resources.
///
/// Implemented by backends (Vulkan ray tracing) and by `MockGraphicsDevice`.
/// `destroy_*` calls come from resource `Drop` impls, which only run when a
/// manager is flushed with a `FrameComplete` token.
pub trait GraphicsDevice {
    /// Create a buffer
    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<BufferKey>;

    /// Upload `data` into `buffer` at byte `offset`
    fn write_buffer(&mut self, buffer: BufferKey, offset: u64, data: &[u8]) -> Result<()>;

    /// GPU virtual address of `buffer`
    fn buffer_device_address(&self, buffer: BufferKey) -> Result<u64>;

    /// Destroy a buffer and free its memory
    fn destroy_buffer(&mut self, buffer: BufferKey);

    /// Create a shader module from already compiled code
    fn create_shader_module(&mut self, desc: &ShaderModuleDesc) -> Result<ShaderModuleKey>;

    /// Destroy a shader module
    fn destroy_shader_module(&mut self, module: ShaderModuleKey);

    /// Build an acceleration structure, including its backing storage
    fn create_acceleration_structure(
        &mut self,
        desc: &AccelerationStructureDesc,
    ) -> Result<AccelerationStructureKey>;

    /// GPU address referenced by TLAS instance records
    fn acceleration_structure_device_address(&self, structure: AccelerationStructureKey) -> Result<u64>;

    /// Destroy an acceleration structure and its backing storage
    fn destroy_acceleration_structure(&mut self, structure: AccelerationStructureKey);

    /// Block until every submitted command has finished
    fn wait_idle(&mut self) -> Result<()>;
}
