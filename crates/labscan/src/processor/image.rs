use crate::error::ProcessError;
use crate::processor::ocr::OcrProcessor;
use crate::processor::{DocumentFormat, DocumentProcessor};

pub struct ImageProcessor {
    ocr: OcrProcessor,
}

impl ImageProcessor {
    pub fn new(ocr: OcrProcessor) -> Self {
        Self { ocr }
    }
}

impl DocumentProcessor for ImageProcessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ProcessError> {
        let _span = tracing::info_span!("processor.image", bytes = bytes.len()).entered();
        self.ocr.recognize(bytes)
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Image)
    }
}
