//! Frequency-Domain ROI Features

use ndarray::Zip;
use roi_volume::{check_shapes, Mask, Volume};
use tracing::debug;

use crate::bands::FrequencyConfig;
use crate::error::FeatureError;
use crate::features::{FeatureSet, VolumeFeatureExtractor};
use crate::fft::{fft3, radial_frequency_grid};
use crate::statistics::mean_and_variance;

/// Band energies, spectral entropy and amplitude statistics of the masked volume's DFT
#[derive(Debug, Clone)]
pub struct FrequencyFeatureExtractor {
    config: FrequencyConfig,
}

impl FrequencyFeatureExtractor {
    /// Create an extractor after validating the band configuration
    pub fn new(config: FrequencyConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FrequencyConfig {
        &self.config
    }

    /// Names of the features every successful call returns
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.config.bands.iter().map(|b| b.feature_name()).collect();
        names.extend(
            ["freq_entropy", "freq_mean_amplitude", "freq_var_amplitude"]
                .iter()
                .map(|s| s.to_string()),
        );
        names
    }
}

impl Default for FrequencyFeatureExtractor {
    fn default() -> Self {
        Self {
            config: FrequencyConfig::default(),
        }
    }
}

impl VolumeFeatureExtractor for FrequencyFeatureExtractor {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn compute(&self, volume: &Volume, mask: &Mask) -> Result<FeatureSet, FeatureError> {
        check_shapes(volume, mask)?;
        if volume.is_empty() {
            return Err(FeatureError::EmptyVolume(volume.shape()));
        }
        if mask.is_region_empty() {
            return Err(FeatureError::EmptyRegion);
        }

        let masked = volume.masked(mask)?;
        let spectrum = fft3(masked.data());
        let power = spectrum.mapv(|c| c.norm_sqr());
        let radius = radial_frequency_grid(masked.shape());

        let total_power = power.sum();
        if total_power == 0.0 {
            return Err(FeatureError::ZeroPower);
        }

        let mut features = FeatureSet::new();

        for band in &self.config.bands {
            let energy = Zip::from(&power)
                .and(&radius)
                .fold(0.0, |acc, &p, &r| if band.contains(r) { acc + p } else { acc });
            features.insert(band.feature_name(), energy);
        }

        // Shannon entropy of the power spectrum treated as a distribution
        let epsilon = self.config.entropy_epsilon;
        let entropy = -power
            .iter()
            .map(|&p| {
                let p = p / total_power;
                p * (p + epsilon).log2()
            })
            .sum::<f64>();
        features.insert("freq_entropy", entropy);

        // DC bin excluded
        let amplitudes: Vec<f64> = spectrum
            .iter()
            .zip(radius.iter())
            .filter(|(_, &r)| r > 0.0)
            .map(|(c, _)| c.norm())
            .collect();
        let (mean, variance) = mean_and_variance(&amplitudes);
        features.insert("freq_mean_amplitude", mean);
        features.insert("freq_var_amplitude", variance);

        debug!(
            "Frequency features: shape={:?}, roi_voxels={}, total_power={:.4e}, entropy={:.4}",
            masked.shape(),
            masked.voxel_count(),
            total_power,
            entropy
        );

        Ok(features)
    }
}
