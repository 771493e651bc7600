use super::*;
use glam::Vec3;

#[test]
fn test_instance_record_is_64_bytes() {
    assert_eq!(std::mem::size_of::<AccelerationInstance>(), 64);
}

#[test]
fn test_instance_packs_index_mask_offset_flags() {
    let instance = AccelerationInstance::new(
        &Mat4::IDENTITY,
        7,
        0xFF,
        42,
        AccelerationInstance::TRIANGLE_FACING_CULL_DISABLE,
        0xDEAD_0000,
    );

    assert_eq!(instance.custom_index(), 7);
    assert_eq!(instance.mask(), 0xFF);
    assert_eq!(instance.sbt_offset(), 42);
    assert_eq!(instance.flags(), AccelerationInstance::TRIANGLE_FACING_CULL_DISABLE);
    assert_eq!(instance.acceleration_structure_reference, 0xDEAD_0000);
}

#[test]
fn test_instance_transform_is_row_major() {
    let matrix = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let instance = AccelerationInstance::new(&matrix, 0, 0xFF, 0, 0, 0);

    assert_eq!(
        instance.transform,
        [
            1.0, 0.0, 0.0, 1.0,
            0.0, 1.0, 0.0, 2.0,
            0.0, 0.0, 1.0, 3.0,
        ]
    );
}

#[test]
fn test_instance_bytes_via_bytemuck() {
    let instances = [AccelerationInstance::new(&Mat4::IDENTITY, 0, 0xFF, 0, 0, 9); 2];
    let bytes: &[u8] = bytemuck::cast_slice(&instances);
    assert_eq!(bytes.len(), 128);
}

#[test]
fn test_primitive_count() {
    let blas = AccelerationStructureDesc::BottomLevel {
        geometries: vec![
            TriangleGeometry {
                vertex_address: 0,
                vertex_stride: 12,
                max_vertex: 3,
                index_address: None,
                primitive_count: 1,
            },
            TriangleGeometry {
                vertex_address: 64,
                vertex_stride: 12,
                max_vertex: 4,
                index_address: Some(128),
                primitive_count: 2,
            },
        ],
    };
    assert_eq!(blas.primitive_count(), 3);

    let tlas = AccelerationStructureDesc::TopLevel { instance_address: 0, instance_count: 5 };
    assert_eq!(tlas.primitive_count(), 5);
}
