//! Unit tests for MockGraphicsDevice and MockFence.

use super::*;
use crate::graphics_device::{BufferUsage, MemoryLocation, ShaderStage, TriangleGeometry};

fn buffer_desc(size: u64) -> BufferDesc {
    BufferDesc {
        size,
        usage: BufferUsage::geometry_input(),
        location: MemoryLocation::CpuToGpu,
    }
}

fn blas_desc() -> AccelerationStructureDesc {
    AccelerationStructureDesc::BottomLevel {
        geometries: vec![TriangleGeometry {
            vertex_address: 0x1_0000,
            vertex_stride: 12,
            max_vertex: 3,
            index_address: None,
            primitive_count: 1,
        }],
    }
}

// ============================================================================
// Buffers
// ============================================================================

#[test]
fn test_create_and_destroy_buffer() {
    let mut device = MockGraphicsDevice::new();
    let key = device.create_buffer(&buffer_desc(64)).unwrap();

    assert_eq!(device.live_buffer_count(), 1);
    assert_eq!(device.buffer(key).unwrap().data.len(), 64);

    device.destroy_buffer(key);
    assert_eq!(device.live_buffer_count(), 0);
    assert_eq!(device.stats().buffers_created, 1);
    assert_eq!(device.stats().buffers_destroyed, 1);
    assert_eq!(device.destroyed(), &[MockObject::Buffer(key)]);
}

#[test]
fn test_empty_buffer_rejected() {
    let mut device = MockGraphicsDevice::new();
    assert!(matches!(device.create_buffer(&buffer_desc(0)), Err(Error::InvalidResource(_))));
}

#[test]
fn test_write_buffer() {
    let mut device = MockGraphicsDevice::new();
    let key = device.create_buffer(&buffer_desc(8)).unwrap();

    device.write_buffer(key, 4, &[1, 2, 3, 4]).unwrap();
    assert_eq!(device.buffer(key).unwrap().data, vec![0, 0, 0, 0, 1, 2, 3, 4]);
}

#[test]
fn test_write_buffer_out_of_range() {
    let mut device = MockGraphicsDevice::new();
    let key = device.create_buffer(&buffer_desc(4)).unwrap();

    assert!(device.write_buffer(key, 2, &[0; 4]).is_err());
}

#[test]
fn test_buffer_addresses_are_distinct_and_aligned() {
    let mut device = MockGraphicsDevice::new();
    let a = device.create_buffer(&buffer_desc(10)).unwrap();
    let b = device.create_buffer(&buffer_desc(10)).unwrap();

    let address_a = device.buffer_device_address(a).unwrap();
    let address_b = device.buffer_device_address(b).unwrap();
    assert_ne!(address_a, address_b);
    assert_eq!(address_a % DEVICE_ADDRESS_ALIGNMENT, 0);
    assert_eq!(address_b % DEVICE_ADDRESS_ALIGNMENT, 0);
}

#[test]
fn test_double_destroy_is_counted() {
    let mut device = MockGraphicsDevice::new();
    let key = device.create_buffer(&buffer_desc(16)).unwrap();

    device.destroy_buffer(key);
    device.destroy_buffer(key);

    assert_eq!(device.stats().buffers_destroyed, 1);
    assert_eq!(device.stats().invalid_destroys, 1);
    assert!(device.buffer_device_address(key).is_err());
}

// ============================================================================
// Shader modules and acceleration structures
// ============================================================================

#[test]
fn test_shader_module_lifecycle() {
    let mut device = MockGraphicsDevice::new();
    let key = device.create_shader_module(&ShaderModuleDesc {
        name: "lambert.rchit".to_string(),
        entry_point: "main".to_string(),
        stage: ShaderStage::ClosestHit,
    }).unwrap();

    assert_eq!(device.shader_module(key).unwrap().stage, ShaderStage::ClosestHit);
    device.destroy_shader_module(key);
    assert_eq!(device.live_shader_module_count(), 0);
    assert_eq!(device.stats().shader_modules_destroyed, 1);
}

#[test]
fn test_acceleration_structure_lifecycle() {
    let mut device = MockGraphicsDevice::new();
    let key = device.create_acceleration_structure(&blas_desc()).unwrap();

    assert!(device.acceleration_structure_device_address(key).unwrap() >= BASE_DEVICE_ADDRESS);
    assert_eq!(device.live_acceleration_structure_count(), 1);

    device.destroy_acceleration_structure(key);
    assert_eq!(device.live_object_count(), 0);
    assert_eq!(device.destroyed(), &[MockObject::AccelerationStructure(key)]);
}

#[test]
fn test_empty_acceleration_structure_rejected() {
    let mut device = MockGraphicsDevice::new();
    let desc = AccelerationStructureDesc::TopLevel { instance_address: 0, instance_count: 0 };
    assert!(device.create_acceleration_structure(&desc).is_err());
}

#[test]
fn test_out_of_memory_toggle() {
    let mut device = MockGraphicsDevice::new();
    device.set_out_of_memory(true);

    assert!(matches!(device.create_buffer(&buffer_desc(4)), Err(Error::OutOfMemory)));
    assert!(matches!(device.create_acceleration_structure(&blas_desc()), Err(Error::OutOfMemory)));

    device.set_out_of_memory(false);
    assert!(device.create_buffer(&buffer_desc(4)).is_ok());
}

#[test]
fn test_wait_idle_counted() {
    let mut device = MockGraphicsDevice::new();
    device.wait_idle().unwrap();
    device.wait_idle().unwrap();
    assert_eq!(device.stats().wait_idle_calls, 2);
}

// ============================================================================
// MockFence
// ============================================================================

#[test]
fn test_mock_fence_counts() {
    let mut fence = MockFence::new();
    fence.wait(100).unwrap();
    fence.reset().unwrap();
    assert_eq!(fence.waits, 1);
    assert_eq!(fence.resets, 1);
}

#[test]
fn test_failing_mock_fence() {
    let mut fence = MockFence::failing();
    assert!(matches!(fence.wait(5), Err(Error::FenceWaitFailed(_))));
    assert_eq!(fence.waits, 1);
}
