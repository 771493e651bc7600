//! Scene resource: models placed in a TLAS.
//!
//! Every model becomes one instance record. Its shader binding table offset
//! is the number of primitives of the models before it, so each primitive
//! of each model gets its own hit group.

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{
    borrow_device, AccelerationInstance, AccelerationStructureDesc, AccelerationStructureKey,
    BufferDesc, BufferKey, BufferUsage, GraphicsDevice, MemoryLocation, SharedDevice,
};
use super::ModelHandle;

/// Visibility mask given to every instance
pub const INSTANCE_MASK: u8 = 0xFF;

pub struct Scene {
    device: SharedDevice,
    name: String,
    models: Vec<ModelHandle>,
    instances: Vec<AccelerationInstance>,
    instance_buffer: BufferKey,
    tlas: AccelerationStructureKey,
}

impl Scene {
    pub fn new(device: &SharedDevice, name: &str, models: Vec<ModelHandle>) -> Result<Self> {
        if models.is_empty() {
            engine_bail!("vrt::Scene", "Scene '{}' needs at least one model", name);
        }

        let mut gpu = borrow_device(device)?;
        let instances = Self::build_instances(&*gpu, &models)?;
        let Ok(instance_count) = u32::try_from(instances.len()) else {
            engine_bail!("vrt::Scene", "Too many instances in scene '{}'", name);
        };

        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        let instance_buffer = gpu.create_buffer(&BufferDesc {
            size: bytes.len() as u64,
            usage: BufferUsage::DEVICE_ADDRESS | BufferUsage::ACCELERATION_STRUCTURE_BUILD_INPUT,
            location: MemoryLocation::CpuToGpu,
        })?;

        let tlas = match Self::build_tlas(&mut *gpu, instance_buffer, bytes, instance_count) {
            Ok(tlas) => tlas,
            Err(error) => {
                gpu.destroy_buffer(instance_buffer);
                return Err(error);
            }
        };
        drop(gpu);

        crate::engine_debug!("vrt::Scene", "Scene '{}' built with {} instances", name, instance_count);

        Ok(Self {
            device: device.clone(),
            name: name.to_string(),
            models,
            instances,
            instance_buffer,
            tlas,
        })
    }

    fn build_instances(device: &dyn GraphicsDevice, models: &[ModelHandle]) -> Result<Vec<AccelerationInstance>> {
        let offsets = sbt_offsets(models.iter().map(|model| model.primitive_count()))?;
        let mut instances = Vec::with_capacity(models.len());

        for (model, sbt_offset) in models.iter().zip(offsets) {
            let blas_address = device.acceleration_structure_device_address(model.blas())?;
            instances.push(AccelerationInstance::new(
                &model.transform(),
                0,
                INSTANCE_MASK,
                sbt_offset,
                AccelerationInstance::TRIANGLE_FACING_CULL_DISABLE,
                blas_address,
            ));
        }
        Ok(instances)
    }

    fn build_tlas(
        device: &mut dyn GraphicsDevice,
        instance_buffer: BufferKey,
        bytes: &[u8],
        instance_count: u32,
    ) -> Result<AccelerationStructureKey> {
        device.write_buffer(instance_buffer, 0, bytes)?;
        let instance_address = device.buffer_device_address(instance_buffer)?;
        device.create_acceleration_structure(&AccelerationStructureDesc::TopLevel {
            instance_address,
            instance_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn models(&self) -> &[ModelHandle] {
        &self.models
    }

    /// Instance records as written to the instance buffer
    pub fn instances(&self) -> &[AccelerationInstance] {
        &self.instances
    }

    /// Total hit groups needed by the scene (one per primitive)
    pub fn hit_group_count(&self) -> u32 {
        self.models.iter().map(|model| model.primitive_count()).sum()
    }

    pub fn instance_buffer(&self) -> BufferKey {
        self.instance_buffer
    }

    pub fn tlas(&self) -> AccelerationStructureKey {
        self.tlas
    }
}

/// Shader binding table offset of each instance: the running primitive count
fn sbt_offsets(primitive_counts: impl IntoIterator<Item = u32>) -> Result<Vec<u32>> {
    let mut offsets = Vec::new();
    let mut next = 0u32;
    for count in primitive_counts {
        if next > AccelerationInstance::MAX_SBT_OFFSET {
            engine_bail!("vrt::Scene",
                "Shader binding table offset {} exceeds {}", next, AccelerationInstance::MAX_SBT_OFFSET);
        }
        offsets.push(next);
        next = match next.checked_add(count) {
            Some(next) => next,
            None => engine_bail!("vrt::Scene", "Too many hit groups in scene"),
        };
    }
    Ok(offsets)
}

impl Drop for Scene {
    fn drop(&mut self) {
        match borrow_device(&self.device) {
            Ok(mut device) => {
                device.destroy_acceleration_structure(self.tlas);
                device.destroy_buffer(self.instance_buffer);
            }
            Err(error) => crate::engine_error!("vrt::Scene", "Leaking TLAS of scene '{}': {}", self.name, error),
        }
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
