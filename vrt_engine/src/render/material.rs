//! Material resource: a named closest-hit shader.
//!
//! Materials are keyed by name and shared by every primitive that uses them.

use crate::error::Result;
use crate::graphics_device::{borrow_device, SharedDevice, ShaderModuleDesc, ShaderModuleKey, ShaderStage};

/// Descriptor for creating a material
#[derive(Debug, Clone)]
pub struct MaterialDesc {
    /// Compiled closest-hit shader to load (e.g. "lambert.rchit.spv")
    pub closest_hit_shader: String,
    /// Shader entry point
    pub entry_point: String,
}

impl MaterialDesc {
    /// Material using `closest_hit_shader` with the `main` entry point
    pub fn new(closest_hit_shader: impl Into<String>) -> Self {
        Self {
            closest_hit_shader: closest_hit_shader.into(),
            entry_point: "main".to_string(),
        }
    }
}

pub struct Material {
    device: SharedDevice,
    name: String,
    closest_hit: ShaderModuleKey,
}

impl Material {
    pub fn new(device: &SharedDevice, name: &str, desc: &MaterialDesc) -> Result<Self> {
        let closest_hit = borrow_device(device)?.create_shader_module(&ShaderModuleDesc {
            name: desc.closest_hit_shader.clone(),
            entry_point: desc.entry_point.clone(),
            stage: ShaderStage::ClosestHit,
        })?;

        crate::engine_trace!("vrt::Material", "Material '{}' uses '{}'", name, desc.closest_hit_shader);
        Ok(Self {
            device: device.clone(),
            name: name.to_string(),
            closest_hit,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Closest-hit shader module
    pub fn closest_hit(&self) -> ShaderModuleKey {
        self.closest_hit
    }
}

impl Drop for Material {
    fn drop(&mut self) {
        match borrow_device(&self.device) {
            Ok(mut device) => device.destroy_shader_module(self.closest_hit),
            Err(error) => crate::engine_error!("vrt::Material",
                "Leaking shader of material '{}': {}", self.name, error),
        }
    }
}
