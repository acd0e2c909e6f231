pub mod context;
pub mod error;
pub mod report;
pub mod runner;

pub use context::PipelineContext;
pub use error::PipelineError;
pub use report::ExtractionReport;
pub use runner::Pipeline;
