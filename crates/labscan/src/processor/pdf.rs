use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ProcessError;
use crate::processor::ocr::OcrProcessor;
use crate::processor::{DocumentFormat, DocumentProcessor};

/// OCRs the first page of a PDF. Later pages are discarded.
pub struct PdfProcessor {
    ocr: OcrProcessor,
}

impl PdfProcessor {
    pub fn new(ocr: OcrProcessor) -> Self {
        Self { ocr }
    }
}

impl DocumentProcessor for PdfProcessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ProcessError> {
        let _span = tracing::info_span!("processor.pdf", bytes = bytes.len()).entered();

        if let Some(page_count) = preflight(bytes)?.filter(|&n| n > 1) {
            tracing::debug!(page_count, "Only the first PDF page is used");
        }

        let image_data = render_first_page(bytes, self.ocr.dpi())?;

        // The rendered PNG is ours, not the caller's, so a failure to decode it
        // is a rendering problem rather than a bad upload.
        self.ocr.recognize(&image_data).map_err(|e| match e {
            ProcessError::ImageProcessing(msg) => ProcessError::RenderFailed(msg),
            other => other,
        })
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Pdf)
    }
}

const PDF_HEADER: &[u8] = b"%PDF-";
/// Poppler accepts a header anywhere in the first kilobyte.
const HEADER_WINDOW: usize = 1024;

/// Check an upload before handing it to `pdftoppm`, returning the page count
/// when lopdf can read it.
///
/// lopdf is stricter than poppler, so a lopdf parse failure rejects the file
/// only when it has no `%PDF-` header either. Otherwise `pdftoppm` decides.
pub fn preflight(pdf_bytes: &[u8]) -> Result<Option<usize>, ProcessError> {
    let doc = match lopdf::Document::load_mem(pdf_bytes) {
        Ok(doc) => doc,
        Err(e) if has_pdf_header(pdf_bytes) => {
            tracing::warn!(error = %e, "lopdf could not parse PDF, deferring to pdftoppm");
            return Ok(None);
        }
        Err(e) => {
            return Err(ProcessError::PdfProcessing(format!(
                "Failed to load PDF: {}",
                e
            )))
        }
    };

    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(ProcessError::PdfProcessing(
            "PDF contains no pages".to_string(),
        ));
    }

    Ok(Some(page_count))
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(HEADER_WINDOW)]
        .windows(PDF_HEADER.len())
        .any(|window| window == PDF_HEADER)
}

/// Removes the wrapped path on drop.
struct TempPath(PathBuf);

impl Drop for TempPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn render_first_page(pdf_bytes: &[u8], dpi: u32) -> Result<Vec<u8>, ProcessError> {
    let temp_dir = std::env::temp_dir();
    let id = uuid::Uuid::new_v4();
    let pdf_path = TempPath(temp_dir.join(format!("labscan_{}.pdf", id)));
    let output_prefix = temp_dir.join(format!("labscan_page_{}", id));
    // -singlefile drops pdftoppm's page-number suffix
    let image_path = TempPath(output_prefix.with_extension("png"));

    std::fs::write(&pdf_path.0, pdf_bytes)
        .map_err(|e| ProcessError::RenderFailed(format!("Failed to write temp PDF: {}", e)))?;

    let output = Command::new("pdftoppm")
        .args(pdftoppm_args(dpi, &pdf_path.0, &output_prefix))
        .output()
        .map_err(|e| {
            ProcessError::RenderFailed(format!(
                "Failed to run pdftoppm: {}. Make sure poppler-utils is installed.",
                e
            ))
        })?;

    if !output.status.success() {
        return Err(pdftoppm_failure(output.status.code(), &output.stderr));
    }

    std::fs::read(&image_path.0)
        .map_err(|e| ProcessError::RenderFailed(format!("Failed to read rendered page: {}", e)))
}

/// Exit codes 1 (cannot open the PDF) and 3 (permissions) mean poppler
/// rejected the document itself.
fn pdftoppm_failure(code: Option<i32>, stderr: &[u8]) -> ProcessError {
    let stderr = String::from_utf8_lossy(stderr);
    match code {
        Some(1) | Some(3) => ProcessError::PdfProcessing(format!(
            "pdftoppm could not read the PDF: {}",
            stderr.trim()
        )),
        _ => ProcessError::RenderFailed(format!("pdftoppm failed: {}", stderr.trim())),
    }
}

fn pdftoppm_args(dpi: u32, pdf_path: &Path, output_prefix: &Path) -> Vec<String> {
    vec![
        "-png".to_string(),
        "-r".to_string(),
        dpi.to_string(),
        "-f".to_string(),
        "1".to_string(),
        "-l".to_string(),
        "1".to_string(),
        "-singlefile".to_string(),
        pdf_path.display().to_string(),
        output_prefix.display().to_string(),
    ]
}
