pub mod extractor;
pub mod features;
pub mod vocabulary;

pub use extractor::{ExtractedValues, ValueExtractor};
pub use features::FeatureVector;
pub use vocabulary::{LabTest, UnknownLabTest};
