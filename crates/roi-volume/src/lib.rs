//! ROI Volumes
//!
//! Provides the 3-D intensity volume, the co-registered region-of-interest mask
//! and the masked volume consumed by the feature extractors.
//!
//! All arrays use axis order (Z, Y, X).

mod error;
pub mod io;
mod volume;

pub use error::VolumeError;
pub use volume::{check_shapes, Mask, MaskedVolume, Volume};

/// Volume shape as (nz, ny, nx)
pub type Shape3 = (usize, usize, usize);
