//! Normalized-Frequency Band Configuration

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Half-open band `[low, high)` of normalized radial frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    /// Band name, emitted as `freq_<name>_energy`
    pub name: String,
    /// Inclusive lower bound
    pub low: f64,
    /// Exclusive upper bound
    pub high: f64,
}

impl FrequencyBand {
    pub fn new(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            name: name.into(),
            low,
            high,
        }
    }

    #[inline]
    pub fn contains(&self, radius: f64) -> bool {
        radius >= self.low && radius < self.high
    }

    /// Feature name for this band's energy
    pub fn feature_name(&self) -> String {
        format!("freq_{}_energy", self.name)
    }
}

/// Configuration of the frequency feature extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Bands summed into energies (default: low 0-0.2, mid 0.2-0.6, high 0.6-1.0)
    pub bands: Vec<FrequencyBand>,
    /// Added inside the entropy logarithm to avoid log(0)
    pub entropy_epsilon: f64,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            bands: vec![
                FrequencyBand::new("low", 0.0, 0.2),
                FrequencyBand::new("mid", 0.2, 0.6),
                FrequencyBand::new("high", 0.6, 1.0),
            ],
            entropy_epsilon: 1e-12,
        }
    }
}

impl FrequencyConfig {
    /// Reject configurations that cannot produce meaningful band energies
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.bands.is_empty() {
            return Err(FeatureError::InvalidBands("no bands configured".into()));
        }

        let mut seen = HashSet::with_capacity(self.bands.len());
        for band in &self.bands {
            if band.name.is_empty() {
                return Err(FeatureError::InvalidBands("band name is empty".into()));
            }
            if !seen.insert(band.name.as_str()) {
                return Err(FeatureError::InvalidBands(format!(
                    "duplicate band name '{}'",
                    band.name
                )));
            }
            if !band.low.is_finite() || !band.high.is_finite() {
                return Err(FeatureError::InvalidBands(format!(
                    "band '{}' has a non-finite bound",
                    band.name
                )));
            }
            if band.low < 0.0 || band.low >= band.high {
                return Err(FeatureError::InvalidBands(format!(
                    "band '{}' requires 0 <= low < high, got [{}, {})",
                    band.name, band.low, band.high
                )));
            }
        }

        if !self.entropy_epsilon.is_finite() || self.entropy_epsilon < 0.0 {
            return Err(FeatureError::InvalidBands(format!(
                "entropy epsilon must be finite and non-negative, got {}",
                self.entropy_epsilon
            )));
        }
        Ok(())
    }
}
