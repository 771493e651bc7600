//! Model resource: a set of primitives and the BLAS built over them.

use glam::Mat4;

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{
    borrow_device, AccelerationStructureDesc, AccelerationStructureKey, SharedDevice,
};
use super::PrimitiveHandle;

/// Descriptor for creating a model
#[derive(Debug, Clone)]
pub struct ModelDesc {
    /// Primitives owned by the model, one BLAS geometry each
    pub primitives: Vec<PrimitiveHandle>,
    /// Object-to-world transform used by scene instances
    pub transform: Mat4,
}

impl ModelDesc {
    pub fn new(primitives: Vec<PrimitiveHandle>) -> Self {
        Self { primitives, transform: Mat4::IDENTITY }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

pub struct Model {
    device: SharedDevice,
    primitives: Vec<PrimitiveHandle>,
    transform: Mat4,
    blas: AccelerationStructureKey,
}

impl Model {
    pub fn new(device: &SharedDevice, desc: ModelDesc) -> Result<Self> {
        if desc.primitives.is_empty() {
            engine_bail!("vrt::Model", "Model needs at least one primitive");
        }

        let mut gpu = borrow_device(device)?;
        let geometries = desc.primitives
            .iter()
            .map(|primitive| primitive.geometry(&*gpu))
            .collect::<Result<Vec<_>>>()?;
        let triangles: u64 = geometries.iter().map(|geometry| u64::from(geometry.primitive_count)).sum();
        let blas = gpu.create_acceleration_structure(&AccelerationStructureDesc::BottomLevel { geometries })?;
        drop(gpu);

        crate::engine_trace!("vrt::Model",
            "Built BLAS over {} primitives ({} triangles)", desc.primitives.len(), triangles);

        Ok(Self {
            device: device.clone(),
            primitives: desc.primitives,
            transform: desc.transform,
            blas,
        })
    }

    pub fn primitives(&self) -> &[PrimitiveHandle] {
        &self.primitives
    }

    /// Number of primitives, which is also the number of hit groups the model uses
    pub fn primitive_count(&self) -> u32 {
        self.primitives.len() as u32
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn blas(&self) -> AccelerationStructureKey {
        self.blas
    }

    /// Device address referenced by scene instances
    pub fn blas_address(&self) -> Result<u64> {
        borrow_device(&self.device)?.acceleration_structure_device_address(self.blas)
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        match borrow_device(&self.device) {
            Ok(mut device) => device.destroy_acceleration_structure(self.blas),
            Err(error) => crate::engine_error!("vrt::Model", "Leaking BLAS: {}", error),
        }
    }
}
