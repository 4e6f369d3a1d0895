//! Feature Set and Extractor Seam

use std::collections::BTreeMap;

use roi_volume::{Mask, Volume};
use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Named scalar features produced for one (volume, mask) pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    values: BTreeMap<String, f64>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a feature
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Feature names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Merge another set into this one; entries of `other` win on name clashes
    pub fn merge(&mut self, other: FeatureSet) {
        self.values.extend(other.values);
    }
}

impl FromIterator<(String, f64)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A stateless feature computation over a volume and its ROI mask
pub trait VolumeFeatureExtractor: Send + Sync {
    /// Short family name, used in logs
    fn name(&self) -> &'static str;

    /// Compute the feature set; pure in its two inputs
    fn compute(&self, volume: &Volume, mask: &Mask) -> Result<FeatureSet, FeatureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites() {
        let mut a = FeatureSet::new();
        a.insert("x", 1.0);
        a.insert("y", 2.0);

        let mut b = FeatureSet::new();
        b.insert("y", 3.0);
        b.insert("z", 4.0);

        a.merge(b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.get("y"), Some(3.0));
        assert_eq!(a.names().collect::<Vec<_>>(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let set: FeatureSet = vec![("b".to_string(), 0.5), ("a".to_string(), 1.0)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"a":1.0,"b":0.5}"#);
    }
}
