use serde::{Deserialize, Serialize};

use super::ModelArtifacts;
use crate::error::PredictionError;
use crate::extraction::FeatureVector;

/// Outcome of one prediction: a disease name or an error message, never both.
///
/// Serializes as `{"disease_prediction": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionResult {
    #[serde(rename = "disease_prediction")]
    DiseasePrediction(String),
    #[serde(rename = "error")]
    Error(String),
}

impl PredictionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::DiseasePrediction(_))
    }

    pub fn disease(&self) -> Option<&str> {
        match self {
            Self::DiseasePrediction(name) => Some(name),
            Self::Error(_) => None,
        }
    }
}

impl From<Result<String, PredictionError>> for PredictionResult {
    fn from(result: Result<String, PredictionError>) -> Self {
        match result {
            Ok(name) => Self::DiseasePrediction(name),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Scales a feature vector, classifies it and decodes the label.
///
/// Stateless between calls; every failure is reported through
/// `PredictionResult::Error`.
#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: ModelArtifacts,
}

impl Predictor {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    pub fn predict(&self, features: &FeatureVector) -> PredictionResult {
        let result = self.try_predict(features);
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "Prediction failed");
        }
        result.into()
    }

    pub fn try_predict(&self, features: &FeatureVector) -> Result<String, PredictionError> {
        let expected = self.artifacts.classifier.n_features_in();
        if features.len() != expected {
            return Err(PredictionError::SchemaMismatch {
                expected,
                actual: features.len(),
            });
        }

        let scaled = self.artifacts.scaler.transform(features.as_slice())?;
        let encoded = self.artifacts.classifier.predict(&scaled)?;
        let disease = self.artifacts.label_decoder.inverse_transform(encoded)?;

        tracing::debug!(encoded, disease = %disease, "Prediction complete");
        Ok(disease)
    }
}
