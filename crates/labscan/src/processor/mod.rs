//! Text normalization: turns an uploaded lab report of any supported format
//! into a single plain-text string.

pub mod docx;
pub mod image;
pub mod ocr;
pub mod pdf;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;

pub use ocr::OcrProcessor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Image,
}

impl DocumentFormat {
    /// Pick the format from a caller-supplied filename. Anything that is not a
    /// PDF or DOCX is treated as a raster image.
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            _ => Self::Image,
        }
    }
}

/// Uploaded bytes plus the format implied by their filename.
#[derive(Debug, Clone, Copy)]
pub struct RawDocument<'a> {
    pub bytes: &'a [u8],
    pub format: DocumentFormat,
}

impl<'a> RawDocument<'a> {
    pub fn new(bytes: &'a [u8], filename: &str) -> Self {
        Self {
            bytes,
            format: DocumentFormat::from_filename(filename),
        }
    }
}

pub trait DocumentProcessor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ProcessError>;
    fn supports(&self, format: DocumentFormat) -> bool;
}

pub struct ProcessorRegistry {
    processors: Vec<Box<dyn DocumentProcessor>>,
}

impl ProcessorRegistry {
    pub fn new(ocr_languages: &[String], ocr_dpi: u32) -> Self {
        let ocr = OcrProcessor::new(ocr_languages, ocr_dpi);
        Self::with_processors(vec![
            Box::new(pdf::PdfProcessor::new(ocr.clone())),
            Box::new(docx::DocxProcessor::new()),
            Box::new(image::ImageProcessor::new(ocr)),
        ])
    }

    pub fn with_processors(processors: Vec<Box<dyn DocumentProcessor>>) -> Self {
        Self { processors }
    }

    /// Route the document to the processor for its format. The format is
    /// decided once from the filename; a decode failure is returned as-is.
    pub fn extract_text(&self, document: RawDocument<'_>) -> Result<String, ProcessError> {
        let processor = self
            .processors
            .iter()
            .find(|p| p.supports(document.format))
            .ok_or_else(|| {
                ProcessError::ImageProcessing(format!(
                    "No processor registered for {:?} documents",
                    document.format
                ))
            })?;

        processor.extract_text(document.bytes)
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("processors", &self.processors.len())
            .finish()
    }
}
