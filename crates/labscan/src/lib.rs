pub mod config;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod processor;

pub use config::{discover_config, load_config, Config};
pub use error::{
    ArtifactError, ConfigError, LabscanError, PredictionError, ProcessError, Result,
};
pub use extraction::{ExtractedValues, FeatureVector, LabTest, ValueExtractor};
pub use model::{ModelArtifacts, PredictionResult, Predictor};
pub use pipeline::{ExtractionReport, Pipeline, PipelineError};
pub use processor::{DocumentFormat, ProcessorRegistry, RawDocument};
