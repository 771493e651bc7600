//! Acceleration structure descriptors and TLAS instance records

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// One triangle geometry of a bottom-level acceleration structure
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGeometry {
    /// Device address of the first vertex position
    pub vertex_address: u64,
    /// Distance between two vertices in bytes
    pub vertex_stride: u64,
    /// Number of vertices
    pub max_vertex: u32,
    /// Device address of 32-bit indices, None for non-indexed geometry
    pub index_address: Option<u64>,
    /// Number of triangles
    pub primitive_count: u32,
}

/// Descriptor for building an acceleration structure
#[derive(Debug, Clone, PartialEq)]
pub enum AccelerationStructureDesc {
    /// BLAS over triangle geometries (one per primitive of a model)
    BottomLevel { geometries: Vec<TriangleGeometry> },
    /// TLAS over an instance buffer of `AccelerationInstance` records
    TopLevel { instance_address: u64, instance_count: u32 },
}

impl AccelerationStructureDesc {
    /// Number of primitives (triangles or instances) the build covers
    pub fn primitive_count(&self) -> u64 {
        match self {
            AccelerationStructureDesc::BottomLevel { geometries } => geometries
                .iter()
                .map(|geometry| u64::from(geometry.primitive_count))
                .sum(),
            AccelerationStructureDesc::TopLevel { instance_count, .. } => u64::from(*instance_count),
        }
    }
}

/// TLAS instance record, laid out as the ray tracing API expects (64 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AccelerationInstance {
    /// Row-major 3x4 object-to-world transform
    pub transform: [f32; 12],
    /// Custom index (low 24 bits) and visibility mask (high 8 bits)
    pub custom_index_and_mask: u32,
    /// Shader binding table record offset (low 24 bits) and flags (high 8 bits)
    pub sbt_offset_and_flags: u32,
    /// Device address of the referenced BLAS
    pub acceleration_structure_reference: u64,
}

impl AccelerationInstance {
    /// Disable triangle facing culling for the instance
    pub const TRIANGLE_FACING_CULL_DISABLE: u8 = 0x01;

    /// Largest shader binding table offset that fits the 24-bit field
    pub const MAX_SBT_OFFSET: u32 = 0x00FF_FFFF;

    const LOW_24_BITS: u32 = 0x00FF_FFFF;

    pub fn new(
        transform: &Mat4,
        custom_index: u32,
        mask: u8,
        sbt_offset: u32,
        flags: u8,
        blas_address: u64,
    ) -> Self {
        Self {
            transform: Self::transform_rows(transform),
            custom_index_and_mask: (custom_index & Self::LOW_24_BITS) | (u32::from(mask) << 24),
            sbt_offset_and_flags: (sbt_offset & Self::LOW_24_BITS) | (u32::from(flags) << 24),
            acceleration_structure_reference: blas_address,
        }
    }

    /// Top three rows of a column-major matrix, flattened row by row
    fn transform_rows(matrix: &Mat4) -> [f32; 12] {
        let mut rows = [0.0; 12];
        for row in 0..3 {
            rows[row * 4..row * 4 + 4].copy_from_slice(&matrix.row(row).to_array());
        }
        rows
    }

    pub fn custom_index(&self) -> u32 {
        self.custom_index_and_mask & Self::LOW_24_BITS
    }

    pub fn mask(&self) -> u8 {
        (self.custom_index_and_mask >> 24) as u8
    }

    pub fn sbt_offset(&self) -> u32 {
        self.sbt_offset_and_flags & Self::LOW_24_BITS
    }

    pub fn flags(&self) -> u8 {
        (self.sbt_offset_and_flags >> 24) as u8
    }
}

#[cfg(test)]
#[path = "acceleration_structure_tests.rs"]
mod tests;
