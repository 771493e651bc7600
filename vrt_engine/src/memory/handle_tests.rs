use super::*;
use crate::config::ResourceConfig;
use crate::memory::{FrameComplete, KeyStrategy, Manager};

fn manager() -> Manager<String, String> {
    Manager::with_config("shaders", KeyStrategy::Explicit, &ResourceConfig::default()).unwrap()
}

#[test]
fn test_deref_to_payload() {
    let shaders = manager();
    let handle = shaders.create_keyed("hit".to_string(), "closest_hit.spv".to_string()).unwrap();

    assert_eq!(handle.len(), "closest_hit.spv".len());
    assert_eq!(*handle, "closest_hit.spv");
}

#[test]
fn test_clone_and_grab_add_owners() {
    let shaders = manager();
    let handle = shaders.create_keyed("hit".to_string(), String::new()).unwrap();

    let cloned = handle.clone();
    let grabbed = handle.grab();
    assert_eq!(handle.use_count(), 3);
    assert!(Handle::ptr_eq(&cloned, &grabbed));
    assert_eq!(cloned.slot(), handle.slot());

    drop(cloned);
    grabbed.release();
    assert_eq!(handle.use_count(), 1);
}

#[test]
fn test_key_and_registration() {
    let shaders = manager();
    let handle = shaders.create_keyed("miss".to_string(), String::new()).unwrap();

    assert_eq!(handle.key(), Some("miss".to_string()));
    assert!(handle.is_registered());
    assert_eq!(handle.manager_name(), "shaders");
}

#[test]
fn test_distinct_resources_are_not_ptr_eq() {
    let shaders = manager();
    let a = shaders.create_keyed("a".to_string(), "same".to_string()).unwrap();
    let b = shaders.create_keyed("b".to_string(), "same".to_string()).unwrap();

    assert!(!Handle::ptr_eq(&a, &b));
    assert_eq!(*a, *b);
}

#[test]
fn test_handle_keeps_payload_after_clear() {
    let shaders = manager();
    let handle = shaders.create_keyed("raygen".to_string(), "raygen.spv".to_string()).unwrap();

    shaders.clear(&FrameComplete::for_tests());

    assert!(!handle.is_registered());
    assert_eq!(*handle, "raygen.spv");
    assert!(!shaders.contains(&"raygen".to_string()));
}

#[test]
fn test_debug_output() {
    let shaders = manager();
    let handle = shaders.create_keyed("hit".to_string(), String::new()).unwrap();

    let text = format!("{:?}", handle);
    assert!(text.contains("shaders"));
    assert!(text.contains("use_count: 1"));
}
