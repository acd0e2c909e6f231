use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, info_span};

use crate::config::Config;
use crate::error::{ArtifactError, ProcessError};
use crate::extraction::{FeatureVector, ValueExtractor};
use crate::model::{ModelArtifacts, PredictionResult, Predictor};
use crate::processor::{ProcessorRegistry, RawDocument};

use super::context::PipelineContext;
use super::error::PipelineError;
use super::report::ExtractionReport;

/// Document bytes in, extracted values and a prediction out.
///
/// Holds only read-only state, so one instance serves any number of
/// concurrent requests.
pub struct Pipeline {
    processor: ProcessorRegistry,
    extractor: ValueExtractor,
    predictor: Predictor,
}

impl Pipeline {
    /// Production constructor: loads the model artifacts named in `config`.
    pub fn from_config(config: &Config) -> Result<Self, ArtifactError> {
        let artifacts = ModelArtifacts::load(&config.artifacts)?;
        let processor = ProcessorRegistry::new(&config.ocr.languages, config.ocr.dpi);
        Ok(Self::new(processor, artifacts))
    }

    pub fn new(processor: ProcessorRegistry, artifacts: ModelArtifacts) -> Self {
        Self {
            processor,
            extractor: ValueExtractor::new(),
            predictor: Predictor::new(artifacts),
        }
    }

    /// Run the full pipeline for one document.
    ///
    /// Only text extraction can fail; prediction problems are reported inside
    /// the returned report.
    pub fn run(&self, bytes: &[u8], filename: &str) -> Result<ExtractionReport, PipelineError> {
        let mut ctx = PipelineContext::new(filename);
        self.run_steps(bytes, &mut ctx)?;
        Ok(ExtractionReport {
            extracted_values: ctx.extracted_values,
            model_prediction: ctx.prediction.unwrap_or_else(|| {
                PredictionResult::Error("prediction step did not run".to_string())
            }),
        })
    }

    /// Read a document from disk and run it. The format comes from the file
    /// name.
    pub fn run_path(&self, path: &Path) -> Result<ExtractionReport, PipelineError> {
        let bytes = std::fs::read(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.run(&bytes, filename)
    }

    /// Run the pipeline on a blocking thread so OCR and PDF rendering never
    /// hold up an async executor thread.
    pub async fn run_blocking(
        self: Arc<Self>,
        bytes: Vec<u8>,
        filename: String,
    ) -> Result<ExtractionReport, PipelineError> {
        tokio::task::spawn_blocking(move || self.run(&bytes, &filename)).await?
    }

    /// [`Pipeline::run_path`] on a blocking thread.
    pub async fn run_path_blocking(
        self: Arc<Self>,
        path: PathBuf,
    ) -> Result<ExtractionReport, PipelineError> {
        tokio::task::spawn_blocking(move || self.run_path(&path)).await?
    }

    /// Run every step, leaving intermediate results in `ctx`.
    pub fn run_steps(&self, bytes: &[u8], ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let _pipeline_span = info_span!("pipeline",
            filename = %ctx.filename,
            format = ?ctx.format,
            bytes = bytes.len(),
        )
        .entered();

        // Step 1: Normalize document to text
        {
            let _step = info_span!("normalize_text").entered();
            self.step_normalize_text(bytes, ctx)?;
        }

        // Step 2: Extract lab values
        {
            let _step = info_span!("extract_values").entered();
            self.step_extract_values(ctx);
        }

        // Step 3: Assemble feature vector
        {
            let _step = info_span!("assemble_features").entered();
            self.step_assemble_features(ctx);
        }

        // Step 4: Predict
        {
            let _step = info_span!("predict").entered();
            self.step_predict(ctx);
        }

        info!(
            values = ctx.extracted_values.len(),
            predicted = ctx.prediction.as_ref().is_some_and(|p| p.is_success()),
            "Document processed"
        );
        Ok(())
    }

    fn step_normalize_text(
        &self,
        bytes: &[u8],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        let document = RawDocument {
            bytes,
            format: ctx.format,
        };
        let text = self.processor.extract_text(document)?;
        debug!(chars = text.len(), "Text extracted");
        ctx.text = Some(text);
        Ok(())
    }

    fn step_extract_values(&self, ctx: &mut PipelineContext) {
        let text = ctx.text.as_deref().unwrap_or_default();
        ctx.extracted_values = self.extractor.extract(text);
        debug!(values = ?ctx.extracted_values, "Lab values extracted");
    }

    fn step_assemble_features(&self, ctx: &mut PipelineContext) {
        ctx.features = Some(FeatureVector::assemble(&ctx.extracted_values));
    }

    fn step_predict(&self, ctx: &mut PipelineContext) {
        let features = match ctx.features.take() {
            Some(features) => features,
            None => FeatureVector::assemble(&ctx.extracted_values),
        };
        ctx.prediction = Some(self.predictor.predict(&features));
        ctx.features = Some(features);
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("processor", &self.processor)
            .field("predictor", &self.predictor)
            .finish_non_exhaustive()
    }
}
