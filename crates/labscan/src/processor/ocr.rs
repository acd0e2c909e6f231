use std::io::Cursor;
use std::sync::Arc;

use crate::error::ProcessError;

/// Shared Tesseract settings. Each call creates its own engine instance, so a
/// single `OcrProcessor` can be used from many threads at once.
#[derive(Clone)]
pub struct OcrProcessor {
    inner: Arc<OcrProcessorInner>,
}

struct OcrProcessorInner {
    languages: String,
    dpi: u32,
}

impl OcrProcessor {
    pub fn new(languages: &[String], dpi: u32) -> Self {
        let lang_str = if languages.is_empty() {
            "eng".to_string()
        } else {
            languages.join("+")
        };

        Self {
            inner: Arc::new(OcrProcessorInner {
                languages: lang_str,
                dpi,
            }),
        }
    }

    pub fn languages(&self) -> &str {
        &self.inner.languages
    }

    pub fn dpi(&self) -> u32 {
        self.inner.dpi
    }

    /// Decode `image_data` as a raster image and recognize its text.
    ///
    /// Undecodable bytes yield `ProcessError::ImageProcessing`; engine failures
    /// yield `ProcessError::OcrFailed`.
    pub fn recognize(&self, image_data: &[u8]) -> Result<String, ProcessError> {
        let img = image::load_from_memory(image_data)
            .map_err(|e| ProcessError::ImageProcessing(format!("Failed to load image: {}", e)))?;

        self.recognize_image(&img)
    }

    pub fn recognize_image(&self, img: &image::DynamicImage) -> Result<String, ProcessError> {
        let _span = tracing::info_span!("processor.ocr", languages = %self.inner.languages)
            .entered();

        // leptess takes encoded bytes, so normalize to PNG in memory
        let mut png_data = Vec::new();
        let mut cursor = Cursor::new(&mut png_data);
        img.write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to convert image: {}", e)))?;

        let mut lt = leptess::LepTess::new(None, &self.inner.languages).map_err(|e| {
            ProcessError::OcrFailed(format!("Failed to initialize Tesseract: {}", e))
        })?;

        lt.set_image_from_mem(&png_data)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to set image for OCR: {}", e)))?;

        let text = lt
            .get_utf8_text()
            .map_err(|e| ProcessError::OcrFailed(format!("OCR failed: {}", e)))?;

        tracing::debug!(chars = text.len(), "OCR complete");
        Ok(text)
    }
}
