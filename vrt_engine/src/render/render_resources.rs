//! RenderResources - one manager per ray tracing resource kind
//!
//! Resources reference each other through handles: scenes own models,
//! models own primitives, primitives own their material. Releasing the last
//! handle to a scene therefore cascades down the chain, one manager at a
//! time, as each level is flushed.

use crate::config::ResourceConfig;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graphics_device::SharedDevice;
use crate::memory::{FrameComplete, KeyStrategy, Manager, ManagerStats};
use super::{
    Material, MaterialDesc, MaterialHandle, Model, ModelDesc, ModelHandle, Primitive,
    PrimitiveDesc, PrimitiveHandle, Scene, SceneHandle,
};

/// Counters of every manager
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderResourcesStats {
    pub materials: ManagerStats,
    pub primitives: ManagerStats,
    pub models: ManagerStats,
    pub scenes: ManagerStats,
}

impl RenderResourcesStats {
    /// Registered resources across all managers
    pub fn live(&self) -> usize {
        self.materials.live + self.primitives.live + self.models.live + self.scenes.live
    }

    /// Released resources waiting for a flush across all managers
    pub fn pending(&self) -> usize {
        self.materials.pending + self.primitives.pending + self.models.pending + self.scenes.pending
    }
}

pub struct RenderResources {
    device: SharedDevice,
    materials: Manager<Material, String>,
    primitives: Manager<Primitive, u32>,
    models: Manager<Model, u32>,
    scenes: Manager<Scene, String>,
}

impl RenderResources {
    /// Create the managers sized from the engine configuration
    pub fn new(device: SharedDevice) -> Result<Self> {
        Self::with_config(device, &Engine::config().resources)
    }

    pub fn with_config(device: SharedDevice, config: &ResourceConfig) -> Result<Self> {
        Ok(Self {
            device,
            materials: Manager::with_config("materials", KeyStrategy::Explicit, config)?,
            primitives: Manager::with_config("primitives", KeyStrategy::auto_index(), config)?,
            models: Manager::with_config("models", KeyStrategy::auto_index(), config)?,
            scenes: Manager::with_config("scenes", KeyStrategy::Explicit, config)?,
        })
    }

    pub fn device(&self) -> &SharedDevice {
        &self.device
    }

    // ===== CREATION =====

    /// Create a material named `name`
    ///
    /// # Errors
    ///
    /// `Error::DuplicateKey` if the name is taken. No shader is loaded then.
    pub fn create_material(&self, name: &str, desc: &MaterialDesc) -> Result<MaterialHandle> {
        let key = name.to_string();
        if self.materials.contains(&key) {
            crate::engine_warn!("vrt::RenderResources", "Material '{}' already exists", name);
            return Err(Error::DuplicateKey(format!("material '{}'", name)));
        }

        let material = Material::new(&self.device, name, desc)?;
        self.materials.create_keyed(key, material)
    }

    /// Create a primitive drawn with `material`
    pub fn create_primitive(&self, material: &MaterialHandle, desc: &PrimitiveDesc) -> Result<PrimitiveHandle> {
        let primitive = Primitive::new(&self.device, material.clone(), desc)?;
        self.primitives.create(primitive)
    }

    /// Create a model and build its BLAS
    pub fn create_model(&self, desc: ModelDesc) -> Result<ModelHandle> {
        let model = Model::new(&self.device, desc)?;
        self.models.create(model)
    }

    /// Create a scene named `name` over `models` and build its TLAS
    ///
    /// # Errors
    ///
    /// `Error::DuplicateKey` if the name is taken. Nothing is built then.
    pub fn create_scene(&self, name: &str, models: &[ModelHandle]) -> Result<SceneHandle> {
        let key = name.to_string();
        if self.scenes.contains(&key) {
            crate::engine_warn!("vrt::RenderResources", "Scene '{}' already exists", name);
            return Err(Error::DuplicateKey(format!("scene '{}'", name)));
        }

        let scene = Scene::new(&self.device, name, models.to_vec())?;
        self.scenes.create_keyed(key, scene)
    }

    // ===== LOOKUP =====

    pub fn material(&self, name: &str) -> Option<MaterialHandle> {
        self.materials.find(&name.to_string())
    }

    pub fn scene(&self, name: &str) -> Option<SceneHandle> {
        self.scenes.find(&name.to_string())
    }

    pub fn materials(&self) -> &Manager<Material, String> {
        &self.materials
    }

    pub fn primitives(&self) -> &Manager<Primitive, u32> {
        &self.primitives
    }

    pub fn models(&self) -> &Manager<Model, u32> {
        &self.models
    }

    pub fn scenes(&self) -> &Manager<Scene, String> {
        &self.scenes
    }

    pub fn stats(&self) -> RenderResourcesStats {
        RenderResourcesStats {
            materials: self.materials.stats(),
            primitives: self.primitives.stats(),
            models: self.models.stats(),
            scenes: self.scenes.stats(),
        }
    }

    // ===== DESTRUCTION =====

    /// Flush every manager, owners before what they own.
    ///
    /// A scene released before this call is destroyed together with every
    /// model, primitive and material only it was keeping alive.
    pub fn flush_free(&self, complete: &FrameComplete<'_>) -> usize {
        self.scenes.flush_free(complete)
            + self.models.flush_free(complete)
            + self.primitives.flush_free(complete)
            + self.materials.flush_free(complete)
    }

    /// Destroy everything. Consumes the token: nothing may be submitted after shutdown.
    ///
    /// Returns the number of pool entries removed. Handles still held by the
    /// caller are detached: their resource, and everything it owns, is
    /// destroyed when the last of them is dropped.
    pub fn shutdown(&self, complete: FrameComplete<'_>) -> usize {
        let mut destroyed = 0;
        loop {
            let flushed = self.flush_free(&complete);
            if flushed == 0 {
                break;
            }
            destroyed += flushed;
        }

        destroyed += self.scenes.clear(&complete)
            + self.models.clear(&complete)
            + self.primitives.clear(&complete)
            + self.materials.clear(&complete);

        crate::engine_info!("vrt::RenderResources",
            "Shutdown after frame {}: {} resources destroyed", complete.frame_index(), destroyed);
        destroyed
    }
}

#[cfg(test)]
#[path = "render_resources_tests.rs"]
mod tests;
