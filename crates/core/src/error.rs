//! Error types for the textswarm core.
//!
//! The simulation path itself never fails; these errors come from the
//! constructors and validators that guard its inputs.

use thiserror::Error;

/// Errors produced by textswarm construction and validation.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// Width or height was zero when creating a mask or scene.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A buffer's length did not match the dimensions it was paired with.
    #[error("buffer length {len} does not match {width}x{height}")]
    BufferMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    /// A configuration value was outside its allowed range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// A scene had no text to rasterize.
    #[error("scene text must not be empty")]
    EmptyText,

    /// A write or read failed (snapshots, scene files).
    #[error("i/o error: {0}")]
    Io(String),
}

impl SwarmError {
    pub(crate) fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        SwarmError::InvalidParam {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
