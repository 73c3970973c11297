//! Grid error types.

use std::any::Any;

use thiserror::Error;

/// Errors returned at the configuration boundary of the grid.
///
/// Runtime faults (misbehaving detectors, malformed popover content, stale
/// sort columns) never surface here; the grid degrades to untyped or
/// unsorted display instead.
#[derive(Debug, Error)]
pub enum GridError {
    /// A configuration value is out of its accepted range.
    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable constraint that was violated.
        reason: String,
    },

    /// Pagination was requested with a zero page size.
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    /// Configuration JSON could not be parsed.
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for grid operations.
pub type Result<T, E = GridError> = std::result::Result<T, E>;

/// Extract a human-readable message from a panic payload.
///
/// Panics can contain either `&str` or `String` payloads. Anything else is
/// reported as a generic message.
pub fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
