//! Error types for the VRT engine
//!
//! This module defines the error types used throughout the engine,
//! including resource lifetime management, frame synchronization and
//! the graphics device collaborator.

use std::fmt;

/// Result type for VRT engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// VRT engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A resource with the same key is already registered in a directory
    DuplicateKey(String),

    /// Explicit key given to an auto-indexed manager, or the other way round
    KeyStrategyMismatch(String),

    /// Invalid resource (stale handle, missing lookup, bad descriptor, etc.)
    InvalidResource(String),

    /// Backend-specific error reported by the graphics device
    BackendError(String),

    /// Out of memory (device memory or pool slot space)
    OutOfMemory,

    /// Waiting on a frame fence failed or timed out
    FenceWaitFailed(String),

    /// Initialization failed (engine, device, subsystems)
    InitializationFailed(String),

    /// Configuration values rejected by validation
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateKey(key) => write!(f, "Duplicate key: {}", key),
            Error::KeyStrategyMismatch(msg) => write!(f, "Key strategy mismatch: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of memory"),
            Error::FenceWaitFailed(msg) => write!(f, "Fence wait failed: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
