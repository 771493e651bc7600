//! Integration tests for Engine logging system
//!
//! These tests verify the logging system and the messages emitted by the
//! resource managers. No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use vrt_engine::vrt::{Engine, Error, ResourceConfig};
use vrt_engine::vrt::log::{Logger, LogEntry, LogSeverity};
use vrt_engine::vrt::memory::{FrameSync, KeyStrategy, Manager};
use vrt_engine::vrt::device::mock_graphics_device::MockFence;
use vrt_engine::vrt::FrameConfig;
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        entries.push(LogEntry {
            severity: entry.severity,
            timestamp: entry.timestamp,
            source: entry.source.clone(),
            message: entry.message.clone(),
            file: entry.file,
            line: entry.line,
        });
    }
}

fn from_source(entries: &Arc<Mutex<Vec<LogEntry>>>, source: &str) -> Vec<(LogSeverity, String)> {
    entries.lock().unwrap()
        .iter()
        .filter(|entry| entry.source == source)
        .map(|entry| (entry.severity, entry.message.clone()))
        .collect()
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Engine::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    let captured = from_source(&entries, "test::module");
    assert_eq!(captured, vec![
        (LogSeverity::Info, "Test info message".to_string()),
        (LogSeverity::Warn, "Test warning message".to_string()),
        (LogSeverity::Error, "Test error message".to_string()),
    ]);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    let captured_entries = entries.lock().unwrap();
    let entry = captured_entries.iter().find(|entry| entry.source == "test::error").unwrap();
    assert_eq!(entry.severity, LogSeverity::Error);
    assert_eq!(entry.message, "Critical error occurred");
    assert_eq!(entry.file, Some("test_file.rs"));
    assert_eq!(entry.line, Some(42));
    drop(captured_entries);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test::reset", "Message 1".to_string());
    assert_eq!(from_source(&entries, "test::reset").len(), 1);

    Engine::reset_logger();

    // Goes to the default logger, not captured
    Engine::log(LogSeverity::Info, "test::reset", "Message 2".to_string());
    assert_eq!(from_source(&entries, "test::reset").len(), 1);
}

#[test]
#[serial]
fn test_integration_min_severity_filter() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);
    Engine::set_min_severity(LogSeverity::Warn);

    Engine::log(LogSeverity::Trace, "test::filter", "Trace message".to_string());
    Engine::log(LogSeverity::Info, "test::filter", "Info message".to_string());
    Engine::log(LogSeverity::Warn, "test::filter", "Warn message".to_string());

    Engine::set_min_severity(LogSeverity::Trace);
    Engine::reset_logger();

    let captured = from_source(&entries, "test::filter");
    assert_eq!(captured, vec![(LogSeverity::Warn, "Warn message".to_string())]);
}

// ============================================================================
// MANAGER AND FRAME MESSAGES
// ============================================================================

#[test]
#[serial]
fn test_integration_duplicate_key_is_warned() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let materials: Manager<u32, String> =
        Manager::with_config("materials", KeyStrategy::Explicit, &ResourceConfig::default()).unwrap();
    let _cow = materials.create_keyed("Cow".to_string(), 1).unwrap();
    let result = materials.create_keyed("Cow".to_string(), 2);

    Engine::reset_logger();

    assert!(matches!(result, Err(Error::DuplicateKey(_))));
    let warnings: Vec<_> = from_source(&entries, "vrt::Manager")
        .into_iter()
        .filter(|(severity, _)| *severity == LogSeverity::Warn)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].1.contains("Cow"));
}

#[test]
#[serial]
fn test_integration_fence_failure_is_logged_with_location() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let mut sync = FrameSync::with_config(MockFence::failing(), &FrameConfig { fence_timeout_ns: 10 });
    sync.begin_frame();
    let result = sync.wait_for_frame().map(|complete| complete.frame_index());

    Engine::reset_logger();

    assert!(matches!(result, Err(Error::FenceWaitFailed(_))));
    let captured = entries.lock().unwrap();
    let entry = captured.iter()
        .find(|entry| entry.source == "vrt::FrameSync" && entry.severity == LogSeverity::Error)
        .unwrap();
    assert!(entry.file.is_some());
    assert!(entry.line.is_some());
}
