//! Feature Extraction Error Types

use roi_volume::{Shape3, VolumeError};
use thiserror::Error;

/// Errors that make a single (volume, mask) extraction fail
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Volume and mask are not co-registered
    #[error("Shape mismatch: volume {volume:?}, mask {mask:?}")]
    ShapeMismatch { volume: Shape3, mask: Shape3 },

    /// At least one axis has length zero
    #[error("Volume has an empty axis: {0:?}")]
    EmptyVolume(Shape3),

    /// Mask selects no voxels
    #[error("Region of interest is empty")]
    EmptyRegion,

    /// Masked volume carries no spectral power, so the spectrum cannot be normalized
    #[error("Masked volume has zero spectral power")]
    ZeroPower,

    /// Band configuration rejected
    #[error("Invalid frequency bands: {0}")]
    InvalidBands(String),

    /// Any other volume failure
    #[error("Volume error: {0}")]
    Volume(VolumeError),
}

impl From<VolumeError> for FeatureError {
    fn from(err: VolumeError) -> Self {
        match err {
            VolumeError::ShapeMismatch { volume, mask } => FeatureError::ShapeMismatch { volume, mask },
            VolumeError::EmptyVolume(shape) => FeatureError::EmptyVolume(shape),
            other => FeatureError::Volume(other),
        }
    }
}
