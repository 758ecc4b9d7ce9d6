//! Unified error handling for physexport
//!
//! This module provides the error type shared by the math helpers and
//! re-used by the scene and export crates.

use thiserror::Error;

/// Unified error type for core operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Geometry Errors ====================

    /// Transform cannot be decomposed into translation, rotation and scale
    #[error("Malformed transform: {reason}")]
    MalformedTransform {
        reason: String,
    },

    // ==================== Data Errors ====================

    /// Value outside its permitted range
    #[error("Value out of range for {field}: {value} (expected {expected})")]
    OutOfRange {
        field: String,
        value: f64,
        expected: String,
    },

    // ==================== General Errors ====================

    /// Custom error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a malformed transform error
    pub fn malformed_transform(reason: impl Into<String>) -> Self {
        Error::MalformedTransform {
            reason: reason.into(),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
