//! Crop prediction boundary: validated soil samples, the pre-trained forest
//! classifier and the static agronomy table.

use std::path::PathBuf;

use thiserror::Error;

pub mod crops;
pub mod forest;
pub mod sample;

pub use crops::{crop_info, CropInfo, FALLBACK_INFO};
pub use forest::ForestModel;
pub use sample::{FieldProblem, SampleFieldError, SoilSample, FEATURE_COUNT};

/// Errors raised while loading or evaluating a classifier artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model artifact is malformed: {0}")]
    Invalid(String),
}

/// Anything that maps a soil sample to a crop label.
pub trait CropClassifier: Send + Sync + 'static {
    /// Predict the crop for a sample. The label is returned lower-cased.
    fn predict(&self, sample: &SoilSample) -> Result<String, ModelError>;
}

/// Classifier that always answers with one label. Handy for tests and demos.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    label: String,
}

impl FixedClassifier {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl CropClassifier for FixedClassifier {
    fn predict(&self, _sample: &SoilSample) -> Result<String, ModelError> {
        Ok(self.label.to_lowercase())
    }
}
