//! Batch runner

use feature_engine::{FeatureSet, VolumeFeatureExtractor};
use rayon::prelude::*;
use roi_volume::io::{load_mask, load_volume};
use roi_volume::{Mask, Volume};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::manifest::SampleDescriptor;
use crate::record::FeatureRecord;
use crate::PipelineError;

/// A sample that produced no record, with the reason
#[derive(Debug, Clone)]
pub struct SkippedSample {
    pub sample: SampleDescriptor,
    pub reason: String,
}

/// Outcome of a batch; records keep manifest order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub records: Vec<FeatureRecord>,
    pub skipped: Vec<SkippedSample>,
}

/// Runs every extractor on every sample
pub struct BatchRunner {
    extractors: Vec<Box<dyn VolumeFeatureExtractor>>,
    max_concurrent_volumes: usize,
}

impl BatchRunner {
    pub fn new(extractors: Vec<Box<dyn VolumeFeatureExtractor>>, max_concurrent_volumes: usize) -> Self {
        info!(
            "Creating batch runner: extractors={}, max_concurrent_volumes={}",
            extractors.len(),
            max_concurrent_volumes
        );
        Self {
            extractors,
            max_concurrent_volumes: max_concurrent_volumes.max(1),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Ok(Self::new(config.extractors()?, config.max_concurrent_volumes))
    }

    /// Run all extractors on an in-memory pair and merge their features
    pub fn extract(
        &self,
        sample: &SampleDescriptor,
        volume: &Volume,
        mask: &Mask,
    ) -> Result<FeatureRecord, PipelineError> {
        let mut features = FeatureSet::new();
        for extractor in &self.extractors {
            let set = extractor
                .compute(volume, mask)
                .map_err(|source| PipelineError::Feature {
                    extractor: extractor.name(),
                    source,
                })?;
            features.merge(set);
        }
        Ok(FeatureRecord::new(sample, features))
    }

    /// Load one sample from disk and extract it
    pub fn process_sample(&self, sample: &SampleDescriptor) -> Result<FeatureRecord, PipelineError> {
        if !sample.mask_path.exists() {
            return Err(PipelineError::MissingMask(sample.mask_path.clone()));
        }

        let volume = load_volume(&sample.volume_path)?;
        let mask = load_mask(&sample.mask_path)?;
        debug!(
            "Processing {} {} ({}): shape={:?}, roi_voxels={}",
            sample.subject_id,
            sample.series_name,
            sample.study_date,
            volume.shape(),
            mask.count()
        );
        self.extract(sample, &volume, &mask)
    }

    /// Process a batch, skipping (and logging) samples that fail
    ///
    /// At most `max_concurrent_volumes` samples are held in memory at once.
    pub fn run(&self, samples: &[SampleDescriptor]) -> Result<BatchReport, PipelineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_concurrent_volumes)
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build worker pool: {}", e)))?;

        let results: Vec<Result<FeatureRecord, PipelineError>> =
            pool.install(|| samples.par_iter().map(|s| self.process_sample(s)).collect());

        let mut report = BatchReport::default();
        for (sample, result) in samples.iter().zip(results) {
            match result {
                Ok(record) => {
                    metrics::counter!("roi_features_samples_processed").increment(1);
                    report.records.push(record);
                }
                Err(e) => {
                    warn!("Skipping {} {}: {}", sample.subject_id, sample.series_name, e);
                    metrics::counter!("roi_features_samples_skipped").increment(1);
                    report.skipped.push(SkippedSample {
                        sample: sample.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch finished: {} processed, {} skipped",
            report.records.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
