//! Primitive resource: one triangle mesh with its material.
//!
//! Vertices are interleaved; only the position component (three f32 at
//! `position_offset` in each vertex) is read by the BLAS build. Indices are
//! optional 32-bit values.

use glam::{Mat4, Vec3};

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{
    borrow_device, BufferDesc, BufferKey, BufferUsage, GraphicsDevice, MemoryLocation,
    SharedDevice, TriangleGeometry,
};
use super::MaterialHandle;

const POSITION_SIZE: u32 = std::mem::size_of::<Vec3>() as u32;

/// Descriptor for creating a primitive
#[derive(Debug, Clone)]
pub struct PrimitiveDesc {
    /// Raw interleaved vertex data
    pub vertices: Vec<u8>,
    /// Size of one vertex in bytes
    pub vertex_size: u32,
    /// Offset of the position inside a vertex
    pub position_offset: u32,
    /// Optional triangle list indices
    pub indices: Option<Vec<u32>>,
    pub transform: Mat4,
}

impl PrimitiveDesc {
    /// Position-only vertices
    pub fn from_positions(positions: &[Vec3], indices: Option<Vec<u32>>) -> Self {
        Self {
            vertices: bytemuck::cast_slice(positions).to_vec(),
            vertex_size: POSITION_SIZE,
            position_offset: 0,
            indices,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

pub struct Primitive {
    device: SharedDevice,
    material: MaterialHandle,
    vertex_buffer: BufferKey,
    index_buffer: Option<BufferKey>,
    vertex_size: u32,
    position_offset: u32,
    vertex_count: u32,
    index_count: u32,
    transform: Mat4,
}

impl Primitive {
    pub fn new(device: &SharedDevice, material: MaterialHandle, desc: &PrimitiveDesc) -> Result<Self> {
        let (vertex_count, index_count) = Self::validate(desc)?;

        let mut gpu = borrow_device(device)?;
        let vertex_buffer = Self::upload(&mut *gpu, &desc.vertices)?;
        let index_buffer = match &desc.indices {
            Some(indices) => match Self::upload(&mut *gpu, bytemuck::cast_slice(indices)) {
                Ok(buffer) => Some(buffer),
                Err(error) => {
                    gpu.destroy_buffer(vertex_buffer);
                    return Err(error);
                }
            },
            None => None,
        };
        drop(gpu);

        crate::engine_trace!("vrt::Primitive",
            "Primitive with {} vertices, {} indices (material '{}')",
            vertex_count, index_count, material.name());

        Ok(Self {
            device: device.clone(),
            material,
            vertex_buffer,
            index_buffer,
            vertex_size: desc.vertex_size,
            position_offset: desc.position_offset,
            vertex_count,
            index_count,
            transform: desc.transform,
        })
    }

    /// Vertex and index counts of a usable descriptor
    fn validate(desc: &PrimitiveDesc) -> Result<(u32, u32)> {
        let position_end = u64::from(desc.position_offset) + u64::from(POSITION_SIZE);
        if desc.vertex_size == 0 || position_end > u64::from(desc.vertex_size) {
            engine_bail!("vrt::Primitive",
                "Position at offset {} does not fit a {} byte vertex", desc.position_offset, desc.vertex_size);
        }
        if desc.vertices.len() % desc.vertex_size as usize != 0 {
            engine_bail!("vrt::Primitive",
                "{} bytes of vertex data is not a multiple of the vertex size {}",
                desc.vertices.len(), desc.vertex_size);
        }

        let Ok(vertex_count) = u32::try_from(desc.vertices.len() / desc.vertex_size as usize) else {
            engine_bail!("vrt::Primitive", "Too many vertices");
        };
        let index_count = match &desc.indices {
            Some(indices) => {
                if let Some(index) = indices.iter().find(|&&index| index >= vertex_count) {
                    engine_bail!("vrt::Primitive",
                        "Index {} out of range ({} vertices)", index, vertex_count);
                }
                let Ok(count) = u32::try_from(indices.len()) else {
                    engine_bail!("vrt::Primitive", "Too many indices");
                };
                count
            }
            None => 0,
        };

        if vertex_count.max(index_count) / 3 == 0 {
            engine_bail!("vrt::Primitive", "Primitive needs at least one triangle");
        }
        Ok((vertex_count, index_count))
    }

    fn upload(device: &mut dyn GraphicsDevice, data: &[u8]) -> Result<BufferKey> {
        let buffer = device.create_buffer(&BufferDesc {
            size: data.len() as u64,
            usage: BufferUsage::geometry_input(),
            location: MemoryLocation::CpuToGpu,
        })?;
        if let Err(error) = device.write_buffer(buffer, 0, data) {
            device.destroy_buffer(buffer);
            return Err(error);
        }
        Ok(buffer)
    }

    pub fn material(&self) -> &MaterialHandle {
        &self.material
    }

    pub fn vertex_buffer(&self) -> BufferKey {
        self.vertex_buffer
    }

    pub fn index_buffer(&self) -> Option<BufferKey> {
        self.index_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Triangles the primitive contributes to a BLAS
    pub fn triangle_count(&self) -> u32 {
        self.vertex_count.max(self.index_count) / 3
    }

    /// BLAS build input for this primitive
    pub fn geometry(&self, device: &dyn GraphicsDevice) -> Result<TriangleGeometry> {
        let vertex_address = device.buffer_device_address(self.vertex_buffer)?;
        let index_address = match self.index_buffer {
            Some(buffer) => Some(device.buffer_device_address(buffer)?),
            None => None,
        };

        Ok(TriangleGeometry {
            vertex_address: vertex_address + u64::from(self.position_offset),
            vertex_stride: u64::from(self.vertex_size),
            max_vertex: self.vertex_count,
            index_address,
            primitive_count: self.triangle_count(),
        })
    }
}

impl Drop for Primitive {
    fn drop(&mut self) {
        match borrow_device(&self.device) {
            Ok(mut device) => {
                device.destroy_buffer(self.vertex_buffer);
                if let Some(index_buffer) = self.index_buffer {
                    device.destroy_buffer(index_buffer);
                }
            }
            Err(error) => crate::engine_error!("vrt::Primitive", "Leaking primitive buffers: {}", error),
        }
    }
}
