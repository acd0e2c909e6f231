//! Test harness for isolated pipeline execution.
//!
//! `TestHarness` writes model artifacts and a config file into a temp
//! directory, then builds the pipeline through the same path production uses.

#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;

use labscan::config::{load_config, Config};
use labscan::{ArtifactError, Pipeline};

use super::builders::{label_encoder, standard_scaler, LinearModelBuilder};

pub struct TestHarness {
    /// Keeps the directory alive for the harness lifetime.
    temp_dir: TempDir,
    /// Path to the written config file.
    pub config_path: PathBuf,
}

impl TestHarness {
    /// Default artifacts: three-class linear model, label encoder, scaler.
    pub fn new() -> Self {
        Self::with_artifacts(
            LinearModelBuilder::new().build(),
            label_encoder(),
            standard_scaler(),
        )
    }

    pub fn with_classifier(classifier: Value) -> Self {
        Self::with_artifacts(classifier, label_encoder(), standard_scaler())
    }

    pub fn with_artifacts(classifier: Value, labels: Value, scaler: Value) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        std::fs::create_dir_all(base.join("models")).expect("Failed to create models dir");
        write_json(base.join("models/classifier.json"), &classifier);
        write_json(base.join("models/labels.json"), &labels);
        write_json(base.join("models/scaler.json"), &scaler);

        let config_path = base.join("labscan.json");
        write_json(
            config_path.clone(),
            &serde_json::json!({
                "version": "1.0",
                "artifacts": {
                    "classifier": "models/classifier.json",
                    "label_decoder": "models/labels.json",
                    "scaler": "models/scaler.json"
                },
                "ocr": { "languages": ["eng"], "dpi": 300 }
            }),
        );

        Self {
            temp_dir,
            config_path,
        }
    }

    pub fn config(&self) -> Config {
        load_config(&self.config_path).expect("Failed to load harness config")
    }

    pub fn try_pipeline(&self) -> Result<Pipeline, ArtifactError> {
        Pipeline::from_config(&self.config())
    }

    pub fn pipeline(&self) -> Pipeline {
        self.try_pipeline().expect("Failed to build pipeline")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn write_json(path: PathBuf, value: &Value) {
    let content = serde_json::to_string_pretty(value).expect("Failed to serialize JSON");
    std::fs::write(&path, content).expect("Failed to write JSON file");
}
