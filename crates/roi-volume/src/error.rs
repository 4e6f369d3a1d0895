//! Volume Error Types

use std::path::PathBuf;

use thiserror::Error;

use crate::Shape3;

/// Errors raised while building, masking or persisting volumes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VolumeError {
    /// Volume and mask are not co-registered
    #[error("Shape mismatch: volume {volume:?}, mask {mask:?}")]
    ShapeMismatch { volume: Shape3, mask: Shape3 },

    /// At least one axis has length zero
    #[error("Volume has an empty axis: {0:?}")]
    EmptyVolume(Shape3),

    /// Failed to read an array from disk
    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// Failed to write an array to disk
    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}
