//! Pipeline configuration
//!
//! Layered as defaults, then an optional TOML/JSON/YAML file, then
//! `ROI_FEATURES__*` environment variables (`__` separates nested keys, e.g.
//! `ROI_FEATURES__FREQUENCY__ENTROPY_EPSILON`).

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};
use feature_engine::{FrequencyConfig, FrequencyFeatureExtractor, IntensityFeatureExtractor, VolumeFeatureExtractor};
use serde::{Deserialize, Serialize};

use crate::PipelineError;

const ENV_PREFIX: &str = "ROI_FEATURES";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Manifest listing the samples to process
    pub manifest: Option<PathBuf>,

    /// JSON-lines output file
    pub output: PathBuf,

    /// Volumes processed at once; bounds memory, not CPU usage
    pub max_concurrent_volumes: usize,

    /// Emit logs as JSON
    pub log_json: bool,

    /// Log level name (trace, debug, info, warn, error)
    pub log_level: String,

    /// Include first-order intensity features
    pub intensity_enabled: bool,

    /// Frequency band scheme
    pub frequency: FrequencyConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            manifest: None,
            output: PathBuf::from("features.jsonl"),
            max_concurrent_volumes: 2,
            log_json: false,
            log_level: "info".to_string(),
            intensity_enabled: true,
            frequency: FrequencyConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load defaults, an optional config file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without consulting the environment
    pub fn from_toml_str(toml: &str) -> Result<Self, PipelineError> {
        let config: Self = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_concurrent_volumes == 0 {
            return Err(PipelineError::Config(
                "max_concurrent_volumes must be at least 1".into(),
            ));
        }
        self.frequency
            .validate()
            .map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Extractors in the order their features are merged
    pub fn extractors(&self) -> Result<Vec<Box<dyn VolumeFeatureExtractor>>, PipelineError> {
        let frequency = FrequencyFeatureExtractor::new(self.frequency.clone())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut extractors: Vec<Box<dyn VolumeFeatureExtractor>> = Vec::with_capacity(2);
        if self.intensity_enabled {
            extractors.push(Box::new(IntensityFeatureExtractor));
        }
        extractors.push(Box::new(frequency));
        Ok(extractors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frequency.bands.len(), 3);

        let names: Vec<_> = config.extractors().unwrap().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["firstorder", "frequency"]);
    }

    #[test]
    fn test_from_toml() {
        let config = PipelineConfig::from_toml_str(
            r#"
            manifest = "samples.json"
            output = "out/features.jsonl"
            max_concurrent_volumes = 4
            intensity_enabled = false

            [frequency]
            entropy_epsilon = 1e-9

            [[frequency.bands]]
            name = "inner"
            low = 0.0
            high = 0.5

            [[frequency.bands]]
            name = "outer"
            low = 0.5
            high = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(config.manifest, Some(PathBuf::from("samples.json")));
        assert_eq!(config.max_concurrent_volumes, 4);
        assert_eq!(config.frequency.entropy_epsilon, 1e-9);
        assert_eq!(config.frequency.bands[1].name, "outer");
        // Unset keys keep their defaults
        assert_eq!(config.log_level, "info");

        let names: Vec<_> = config.extractors().unwrap().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["frequency"]);
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let err = PipelineConfig::from_toml_str("max_concurrent_volumes = 0").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_bands() {
        let err = PipelineConfig::from_toml_str(
            r#"
            [[frequency.bands]]
            name = "low"
            low = 0.4
            high = 0.2
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
