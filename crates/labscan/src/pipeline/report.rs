use serde::{Deserialize, Serialize};

use crate::extraction::ExtractedValues;
use crate::model::PredictionResult;

/// What the caller receives for one document.
///
/// `model_prediction` may carry an error while `extracted_values` is still
/// populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub extracted_values: ExtractedValues,
    pub model_prediction: PredictionResult,
}
