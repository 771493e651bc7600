//! Integration tests for Engine configuration
//!
//! Managers created without an explicit configuration take their pool
//! sizing from the active engine configuration. No GPU required.
//!
//! Run with: cargo test --test engine_integration_tests

use std::cell::RefCell;
use std::rc::Rc;
use vrt_engine::vrt::{Engine, EngineConfig, Error, ResourceConfig};
use vrt_engine::vrt::device::SharedDevice;
use vrt_engine::vrt::device::mock_graphics_device::MockGraphicsDevice;
use vrt_engine::vrt::memory::Manager;
use vrt_engine::vrt::render::{MaterialDesc, RenderResources};
use serial_test::serial;

// ============================================================================
// CONFIGURATION TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_default_config_without_initialize() {
    Engine::shutdown();
    assert!(!Engine::is_initialized());

    let manager: Manager<u8, u32> = Manager::auto_indexed("bytes").unwrap();
    let _first = manager.create(1).unwrap();
    assert_eq!(manager.capacity(), 16);
}

#[test]
#[serial]
fn test_integration_managers_follow_engine_config() {
    let config = EngineConfig {
        resources: ResourceConfig::default().with_block_size(4).with_warm_blocks(1),
        ..EngineConfig::default()
    };
    Engine::initialize(config).unwrap();

    let device: SharedDevice = Rc::new(RefCell::new(MockGraphicsDevice::new()));
    let resources = RenderResources::new(device).unwrap();
    assert_eq!(resources.materials().capacity(), 4);

    let handles: Vec<_> = (0..5)
        .map(|i| resources.create_material(&format!("m{}", i), &MaterialDesc::new("l.spv")).unwrap())
        .collect();
    assert_eq!(handles.len(), 5);
    assert_eq!(resources.materials().block_count(), 2);

    Engine::shutdown();
}

#[test]
#[serial]
fn test_integration_invalid_config_rejected() {
    let config = EngineConfig {
        resources: ResourceConfig::default().with_block_size(0),
        ..EngineConfig::default()
    };

    assert!(matches!(Engine::initialize(config), Err(Error::InvalidConfig(_))));
    assert!(!Engine::is_initialized());
}
