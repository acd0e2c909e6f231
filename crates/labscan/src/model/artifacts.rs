use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::classifier::ClassifierArtifact;
use super::decoder::LabelEncoder;
use super::scaler::StandardScaler;
use super::{Classifier, FeatureScaler, LabelDecoder};
use crate::error::ArtifactError;
use crate::extraction::LabTest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    #[serde(default = "default_classifier_path")]
    pub classifier: PathBuf,
    #[serde(default = "default_label_decoder_path")]
    pub label_decoder: PathBuf,
    #[serde(default = "default_scaler_path")]
    pub scaler: PathBuf,
}

fn default_classifier_path() -> PathBuf {
    PathBuf::from("model.json")
}

fn default_label_decoder_path() -> PathBuf {
    PathBuf::from("label_encoder.json")
}

fn default_scaler_path() -> PathBuf {
    PathBuf::from("scaler.json")
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            classifier: default_classifier_path(),
            label_decoder: default_label_decoder_path(),
            scaler: default_scaler_path(),
        }
    }
}

impl ArtifactPaths {
    /// Resolve relative paths against `base`.
    pub fn resolve_against(&self, base: &Path) -> Self {
        let resolve = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };
        Self {
            classifier: resolve(&self.classifier),
            label_decoder: resolve(&self.label_decoder),
            scaler: resolve(&self.scaler),
        }
    }
}

/// The three read-only objects the prediction adapter needs. Loaded once at
/// startup and shared across requests; cloning only bumps reference counts.
#[derive(Clone)]
pub struct ModelArtifacts {
    pub classifier: Arc<dyn Classifier>,
    pub label_decoder: Arc<dyn LabelDecoder>,
    pub scaler: Arc<dyn FeatureScaler>,
}

impl ModelArtifacts {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        label_decoder: Arc<dyn LabelDecoder>,
        scaler: Arc<dyn FeatureScaler>,
    ) -> Self {
        Self {
            classifier,
            label_decoder,
            scaler,
        }
    }

    /// Load and validate all three artifacts. Any failure is fatal to startup.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let _span = tracing::info_span!("model.load_artifacts").entered();

        let classifier: ClassifierArtifact = read_artifact(&paths.classifier)?;
        check(&paths.classifier, classifier.validate())?;

        let label_decoder: LabelEncoder = read_artifact(&paths.label_decoder)?;
        check(&paths.label_decoder, label_decoder.validate())?;

        let scaler: StandardScaler = read_artifact(&paths.scaler)?;
        check(&paths.scaler, scaler.validate())?;

        if classifier.n_features_in() != LabTest::COUNT {
            tracing::warn!(
                expected = LabTest::COUNT,
                actual = classifier.n_features_in(),
                "Classifier feature count differs from the lab test vocabulary; every prediction will fail"
            );
        }

        tracing::info!(
            classifier = %paths.classifier.display(),
            classes = label_decoder.classes.len(),
            "Model artifacts loaded"
        );

        Ok(Self::new(
            Arc::new(classifier),
            Arc::new(label_decoder),
            Arc::new(scaler),
        ))
    }
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("n_features_in", &self.classifier.n_features_in())
            .finish_non_exhaustive()
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|e| ArtifactError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| ArtifactError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn check(path: &Path, result: Result<(), String>) -> Result<(), ArtifactError> {
    result.map_err(|reason| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    })
}
