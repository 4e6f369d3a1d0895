//! Feature Engineering Engine
//!
//! Computes per-volume descriptors over a region of interest:
//! - frequency-domain band energies, spectral entropy and amplitude statistics
//! - first-order intensity statistics

mod bands;
mod error;
mod features;
mod fft;
mod frequency;
mod statistics;

pub use bands::{FrequencyBand, FrequencyConfig};
pub use error::FeatureError;
pub use features::{FeatureSet, VolumeFeatureExtractor};
pub use fft::{fft3, fft_frequencies, radial_frequency_grid};
pub use frequency::FrequencyFeatureExtractor;
pub use statistics::{IntensityFeatureExtractor, StatisticalFeatures};
