//! First-Order Intensity Statistics

use roi_volume::{Mask, Volume};
use tracing::debug;

use crate::error::FeatureError;
use crate::features::{FeatureSet, VolumeFeatureExtractor};

/// Arithmetic mean and population variance; `(0.0, 0.0)` for an empty slice
pub(crate) fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance)
}

/// Statistical features of a set of intensities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticalFeatures {
    /// Mean value
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    /// Standard deviation
    pub std_dev: f64,
    /// Skewness (asymmetry)
    pub skewness: f64,
    /// Excess kurtosis (tailedness)
    pub kurtosis: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Sum of squared values
    pub energy: f64,
    /// Number of values
    pub count: usize,
}

impl StatisticalFeatures {
    /// Compute statistical features from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        let mut m2 = 0.0;
        let mut m3 = 0.0;
        let mut m4 = 0.0;
        let mut energy = 0.0;

        for &v in values {
            let d = v - mean;
            m2 += d * d;
            m3 += d * d * d;
            m4 += d * d * d * d;
            energy += v * v;
        }

        let variance = m2 / n;
        let std_dev = variance.sqrt();

        // Skewness: E[(X-μ)³] / σ³
        let skewness = if std_dev > 0.0 {
            (m3 / n) / (std_dev * std_dev * std_dev)
        } else {
            0.0
        };

        // Kurtosis: E[(X-μ)⁴] / σ⁴ - 3 (excess kurtosis)
        let kurtosis = if std_dev > 0.0 {
            (m4 / n) / (variance * variance) - 3.0
        } else {
            0.0
        };

        Self {
            mean,
            variance,
            std_dev,
            skewness,
            kurtosis,
            min,
            max,
            energy,
            count: values.len(),
        }
    }

    /// Named feature set with the `firstorder_` prefix
    pub fn to_feature_set(&self) -> FeatureSet {
        let mut features = FeatureSet::new();
        features.insert("firstorder_mean", self.mean);
        features.insert("firstorder_variance", self.variance);
        features.insert("firstorder_std_dev", self.std_dev);
        features.insert("firstorder_skewness", self.skewness);
        features.insert("firstorder_kurtosis", self.kurtosis);
        features.insert("firstorder_min", self.min);
        features.insert("firstorder_max", self.max);
        features.insert("firstorder_range", self.max - self.min);
        features.insert("firstorder_energy", self.energy);
        features.insert("firstorder_voxel_count", self.count as f64);
        features
    }
}

/// First-order statistics of the intensities inside the ROI
#[derive(Debug, Clone, Copy, Default)]
pub struct IntensityFeatureExtractor;

impl VolumeFeatureExtractor for IntensityFeatureExtractor {
    fn name(&self) -> &'static str {
        "firstorder"
    }

    fn compute(&self, volume: &Volume, mask: &Mask) -> Result<FeatureSet, FeatureError> {
        let values = volume.roi_values(mask)?;
        if values.is_empty() {
            return Err(FeatureError::EmptyRegion);
        }

        let stats = StatisticalFeatures::compute(&values);
        debug!(
            "First-order features: roi_voxels={}, mean={:.4}, std_dev={:.4}",
            stats.count, stats.mean, stats.std_dev
        );
        Ok(stats.to_feature_set())
    }
}
