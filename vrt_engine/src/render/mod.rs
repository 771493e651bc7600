//! Ray tracing resources built on the managed memory layer

pub mod material;
pub mod primitive;
pub mod model;
pub mod scene;
pub mod render_resources;

pub use material::{Material, MaterialDesc};
pub use primitive::{Primitive, PrimitiveDesc};
pub use model::{Model, ModelDesc};
pub use scene::{Scene, INSTANCE_MASK};
pub use render_resources::{RenderResources, RenderResourcesStats};

use crate::memory::Handle;

pub type MaterialHandle = Handle<Material, String>;
pub type PrimitiveHandle = Handle<Primitive, u32>;
pub type ModelHandle = Handle<Model, u32>;
pub type SceneHandle = Handle<Scene, String>;
