//! Pre-trained model artifacts and the prediction adapter built on them.

pub mod artifacts;
pub mod classifier;
pub mod decoder;
pub mod predictor;
pub mod scaler;

use crate::error::PredictionError;

pub use artifacts::{ArtifactPaths, ModelArtifacts};
pub use classifier::{ClassifierArtifact, DecisionTree, ForestClassifier, LinearClassifier};
pub use decoder::LabelEncoder;
pub use predictor::{PredictionResult, Predictor};
pub use scaler::StandardScaler;

/// Maps a scaled feature vector to an encoded class label.
pub trait Classifier: Send + Sync {
    /// Number of features the model was trained on.
    fn n_features_in(&self) -> usize;
    fn predict(&self, features: &[f64]) -> Result<i64, PredictionError>;
}

/// Normalizes raw measurements into the distribution the classifier expects.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, PredictionError>;
}

/// Turns an encoded class label back into a disease name.
pub trait LabelDecoder: Send + Sync {
    fn inverse_transform(&self, code: i64) -> Result<String, PredictionError>;
}
