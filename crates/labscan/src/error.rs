use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabscanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Model artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),
}

impl LabscanError {
    /// True when a document was rejected because its bytes do not match the
    /// format implied by its name.
    pub fn is_decode_error(&self) -> bool {
        match self {
            Self::Process(e) => e.is_decode_error(),
            Self::Pipeline(e) => e.is_decode_error(),
            Self::Config(_) | Self::Artifact(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Failures while turning document bytes into text.
///
/// The `PdfProcessing`, `DocxProcessing` and `ImageProcessing` variants are
/// decode errors: the bytes could not be interpreted as the format implied by
/// the filename. They are never retried with another format.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to process PDF: {0}")]
    PdfProcessing(String),

    #[error("Failed to process DOCX: {0}")]
    DocxProcessing(String),

    #[error("Failed to process image: {0}")]
    ImageProcessing(String),

    #[error("PDF rendering failed: {0}")]
    RenderFailed(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),
}

impl ProcessError {
    /// True when the input bytes are not a valid instance of the implied format.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::PdfProcessing(_) | Self::DocxProcessing(_) | Self::ImageProcessing(_)
        )
    }
}

/// Startup failures loading the classifier, label decoder or scaler.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to read artifact '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact '{path}': {reason}")]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Expected {expected} features, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Scaling failed: {0}")]
    Scaling(String),

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Label decoding failed: {0}")]
    Decoding(String),
}

pub type Result<T> = std::result::Result<T, LabscanError>;
