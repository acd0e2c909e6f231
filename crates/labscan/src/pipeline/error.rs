use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Document processing failed: {0}")]
    Processing(#[from] crate::error::ProcessError),

    #[error("Pipeline task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// True when the uploaded bytes are not a valid document of the implied
    /// format. The caller should resubmit corrected input.
    pub fn is_decode_error(&self) -> bool {
        match self {
            Self::Processing(e) => e.is_decode_error(),
            Self::Join(_) => false,
        }
    }
}
