//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_duplicate_key_display() {
    let err = Error::DuplicateKey("\"Cow\"".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Duplicate key"));
    assert!(display.contains("Cow"));
}

#[test]
fn test_key_strategy_mismatch_display() {
    let err = Error::KeyStrategyMismatch("primitives are auto-indexed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Key strategy mismatch"));
    assert!(display.contains("auto-indexed"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of memory");
}

#[test]
fn test_fence_wait_failed_display() {
    let err = Error::FenceWaitFailed("timeout after 16ms".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Fence wait failed"));
    assert!(display.contains("16ms"));
}

#[test]
fn test_invalid_config_display() {
    let err = Error::InvalidConfig("block_size must be > 0".to_string());
    assert!(format!("{}", err).contains("block_size"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug1 = format!("{:?}", Error::BackendError("test".to_string()));
    assert!(debug1.contains("BackendError"));

    let debug2 = format!("{:?}", Error::InvalidResource("stale".to_string()));
    assert!(debug2.contains("InvalidResource"));

    let debug3 = format!("{:?}", Error::InitializationFailed("init".to_string()));
    assert!(debug3.contains("InitializationFailed"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::DuplicateKey("Cow".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT TYPE TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::OutOfMemory)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    let result = outer();
    assert!(matches!(result, Err(Error::OutOfMemory)));
}
