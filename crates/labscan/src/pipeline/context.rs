use crate::extraction::{ExtractedValues, FeatureVector};
use crate::model::PredictionResult;
use crate::processor::DocumentFormat;

/// Intermediate results of one pipeline run. Request-scoped; dropped once the
/// report is built.
#[derive(Debug)]
pub struct PipelineContext {
    // Input
    pub filename: String,
    pub format: DocumentFormat,

    // Step 1 result
    pub text: Option<String>,

    // Step 2 result
    pub extracted_values: ExtractedValues,

    // Step 3 result
    pub features: Option<FeatureVector>,

    // Step 4 result
    pub prediction: Option<PredictionResult>,
}

impl PipelineContext {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            format: DocumentFormat::from_filename(filename),
            text: None,
            extracted_values: ExtractedValues::new(),
            features: None,
            prediction: None,
        }
    }
}
