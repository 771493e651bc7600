//! VRT Engine - global facade for configuration and logging
//!
//! Resource managers are single-threaded (`Rc`-based) and owned by the
//! render thread, so they are NOT stored here. The facade only keeps the
//! process-wide pieces: the active configuration and the logger.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::config::EngineConfig;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Minimum severity forwarded to the logger
static MIN_SEVERITY: OnceLock<RwLock<LogSeverity>> = OnceLock::new();

struct EngineState {
    /// Active configuration, None until `Engine::initialize`
    config: RwLock<Option<EngineConfig>>,
}

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

fn min_severity_lock() -> &'static RwLock<LogSeverity> {
    MIN_SEVERITY.get_or_init(|| RwLock::new(LogSeverity::Trace))
}

// ===== PUBLIC API =====

/// Main engine facade
///
/// # Example
///
/// ```no_run
/// use vrt_engine::vrt::{Engine, EngineConfig};
///
/// Engine::initialize(EngineConfig::default())?;
/// let config = Engine::config();
/// assert_eq!(config.resources.block_size, 16);
/// Engine::shutdown();
/// # Ok::<(), vrt_engine::vrt::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Initialize the engine with a configuration
    ///
    /// Calling it again replaces the stored configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration fails validation,
    /// or `Error::InitializationFailed` if the state lock is poisoned.
    pub fn initialize(config: EngineConfig) -> Result<()> {
        if let Err(error) = config.validate() {
            crate::engine_error!("vrt::Engine", "Rejected configuration: {}", error);
            return Err(error);
        }

        let state = ENGINE_STATE.get_or_init(|| EngineState {
            config: RwLock::new(None),
        });
        let mut lock = state.config.write()
            .map_err(|_| Error::InitializationFailed("Engine config lock poisoned".to_string()))?;
        *lock = Some(config);

        crate::engine_info!("vrt::Engine", "Engine initialized");
        Ok(())
    }

    /// Whether `initialize` has been called since the last `shutdown`
    pub fn is_initialized() -> bool {
        ENGINE_STATE.get()
            .and_then(|state| state.config.read().ok().map(|lock| lock.is_some()))
            .unwrap_or(false)
    }

    /// Active configuration, or the default configuration when not initialized
    pub fn config() -> EngineConfig {
        ENGINE_STATE.get()
            .and_then(|state| state.config.read().ok().and_then(|lock| lock.clone()))
            .unwrap_or_default()
    }

    /// Drop the stored configuration
    ///
    /// Must be called after every `RenderResources` has been shut down.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut config) = state.config.write() {
                if config.take().is_some() {
                    crate::engine_info!("vrt::Engine", "Engine shut down");
                }
            }
        }
    }

    // ===== LOGGING API =====

    /// Replace the default logger with a custom implementation
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to `DefaultLogger`
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Drop every entry below `severity`
    pub fn set_min_severity(severity: LogSeverity) {
        if let Ok(mut lock) = min_severity_lock().write() {
            *lock = severity;
        }
    }

    /// Current severity threshold
    pub fn min_severity() -> LogSeverity {
        min_severity_lock().read().map(|lock| *lock).unwrap_or(LogSeverity::Trace)
    }

    /// Log without file:line (used by engine_info!, engine_warn!, etc.)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Log with file:line information (used by engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        if entry.severity < Self::min_severity() {
            return;
        }
        if let Ok(lock) = logger_lock().read() {
            lock.log(&entry);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
