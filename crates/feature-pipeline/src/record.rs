//! Feature records and the JSON-lines writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use feature_engine::FeatureSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::manifest::SampleDescriptor;
use crate::PipelineError;

/// Per-sample output: identifying metadata plus every extracted feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub subject_id: String,
    pub study_date: String,
    pub series_name: String,
    #[serde(flatten)]
    pub features: FeatureSet,
}

impl FeatureRecord {
    pub fn new(sample: &SampleDescriptor, features: FeatureSet) -> Self {
        Self {
            subject_id: sample.subject_id.clone(),
            study_date: sample.study_date.clone(),
            series_name: sample.series_name.clone(),
            features,
        }
    }
}

/// Writes one JSON object per line
pub struct RecordWriter<W: Write> {
    writer: W,
}

impl RecordWriter<BufWriter<File>> {
    /// Create (or truncate) `path`, creating parent directories as needed
    pub fn create(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        debug!("Writing feature records to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, record: &FeatureRecord) -> Result<(), PipelineError> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|e| PipelineError::Output(e.to_string()))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W, PipelineError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> SampleDescriptor {
        SampleDescriptor {
            subject_id: "QIN-BREAST-02-0007".into(),
            study_date: "1990-01-01".into(),
            series_name: "THRIVE SENSE".into(),
            volume_path: PathBuf::from("v.npy"),
            mask_path: PathBuf::from("m.npy"),
        }
    }

    #[test]
    fn test_record_is_flat_json_line() {
        let mut features = FeatureSet::new();
        features.insert("freq_entropy", 2.5);
        features.insert("firstorder_mean", 10.0);

        let mut writer = RecordWriter::new(Vec::new());
        writer.write(&FeatureRecord::new(&sample(), features)).unwrap();
        let bytes = writer.finish().unwrap();

        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["subject_id"], "QIN-BREAST-02-0007");
        assert_eq!(value["series_name"], "THRIVE SENSE");
        assert_eq!(value["freq_entropy"], 2.5);
        assert_eq!(value["firstorder_mean"], 10.0);
        assert!(value.get("volume_path").is_none());
    }

    #[test]
    fn test_one_line_per_record() {
        let mut writer = RecordWriter::new(Vec::new());
        for _ in 0..3 {
            writer.write(&FeatureRecord::new(&sample(), FeatureSet::new())).unwrap();
        }
        let text = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
