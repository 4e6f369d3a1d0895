//! Sample manifest

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// One (volume, mask) pair and the metadata carried into its record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDescriptor {
    /// Subject identifier
    pub subject_id: String,
    /// Acquisition/study date
    pub study_date: String,
    /// Series name
    pub series_name: String,
    /// `.npy` intensity volume
    pub volume_path: PathBuf,
    /// `.npy` ROI mask
    pub mask_path: PathBuf,
}

impl SampleDescriptor {
    fn resolve_against(mut self, base: &Path) -> Self {
        if self.volume_path.is_relative() {
            self.volume_path = base.join(&self.volume_path);
        }
        if self.mask_path.is_relative() {
            self.mask_path = base.join(&self.mask_path);
        }
        self
    }
}

/// Read a JSON array of samples; relative paths resolve against the manifest's directory
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<SampleDescriptor>, PipelineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::Manifest(format!("{}: {}", path.display(), e)))?;
    let samples: Vec<SampleDescriptor> = serde_json::from_str(&text)
        .map_err(|e| PipelineError::Manifest(format!("{}: {}", path.display(), e)))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(samples
        .into_iter()
        .map(|sample| sample.resolve_against(base))
        .collect())
}
