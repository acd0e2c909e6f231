use std::io::{Cursor, Read, Seek};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ProcessError;
use crate::processor::{DocumentFormat, DocumentProcessor};

/// Reads body paragraph text straight from the DOCX container. No OCR.
pub struct DocxProcessor;

impl DocxProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor for DocxProcessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ProcessError> {
        let _span = tracing::info_span!("processor.docx", bytes = bytes.len()).entered();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ProcessError::DocxProcessing(format!("Failed to open DOCX: {}", e)))?;

        let paragraphs = extract_paragraphs(&mut archive)?;
        tracing::debug!(paragraphs = paragraphs.len(), "DOCX paragraphs read");

        Ok(paragraphs.join("\n"))
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Docx)
    }
}

fn extract_paragraphs<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<Vec<String>, ProcessError> {
    let mut document_xml = archive
        .by_name("word/document.xml")
        .map_err(|e| ProcessError::DocxProcessing(format!("Failed to find document.xml: {}", e)))?;

    let mut xml_content = String::new();
    document_xml
        .read_to_string(&mut xml_content)
        .map_err(|e| ProcessError::DocxProcessing(format!("Failed to read document.xml: {}", e)))?;

    parse_paragraphs(&xml_content)
}

/// Collect the text of the paragraphs directly under `w:body`, in order.
///
/// Paragraphs nested deeper (table cells, text boxes, content controls) are
/// skipped, and so is their text.
fn parse_paragraphs(xml: &str) -> Result<Vec<String>, ProcessError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    // Open element count before the current event
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    // Body-level paragraph being read, with the depth it opened at
    let mut current: Option<(String, usize)> = None;
    // Paragraphs open inside `current` (text boxes)
    let mut nested = 0usize;
    let mut in_text_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                match e.local_name().as_ref() {
                    b"body" if body_depth.is_none() => body_depth = Some(depth),
                    b"p" => {
                        if current.is_some() {
                            nested += 1;
                        } else if is_body_child(body_depth, depth) {
                            current = Some((String::new(), depth));
                        }
                    }
                    b"t" => in_text_element = true,
                    _ => {}
                }
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" if current.is_none() && is_body_child(body_depth, depth) => {
                    paragraphs.push(String::new())
                }
                b"tab" => push_text(&mut current, nested, "\t"),
                b"br" if is_text_break(e) => push_text(&mut current, nested, "\n"),
                b"cr" => push_text(&mut current, nested, "\n"),
                _ => {}
            },
            Ok(Event::End(ref e)) => {
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"t" => in_text_element = false,
                    b"p" => match current.take() {
                        Some((paragraph, opened_at)) if opened_at == depth => {
                            paragraphs.push(paragraph)
                        }
                        other => {
                            current = other;
                            nested = nested.saturating_sub(1);
                        }
                    },
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_text_element {
                    let decoded = e.decode().map_err(|err| {
                        ProcessError::DocxProcessing(format!("Invalid text content: {}", err))
                    })?;
                    push_text(&mut current, nested, &decoded);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text_element {
                    if let Some(resolved) = resolve_reference(&e) {
                        push_text(&mut current, nested, &resolved);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ProcessError::DocxProcessing(format!(
                    "XML parsing error: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn is_body_child(body_depth: Option<usize>, depth: usize) -> bool {
    body_depth.is_some_and(|body| depth == body + 1)
}

/// Page and column breaks carry no text; only line breaks become `\n`.
fn is_text_break(element: &quick_xml::events::BytesStart<'_>) -> bool {
    !element.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"type" && attr.value.as_ref() != b"textWrapping"
    })
}

fn resolve_reference(reference: &quick_xml::events::BytesRef<'_>) -> Option<String> {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        return Some(ch.to_string());
    }
    let name = reference.decode().ok()?;
    quick_xml::escape::resolve_predefined_entity(&name).map(str::to_string)
}

fn push_text(current: &mut Option<(String, usize)>, nested: usize, text: &str) {
    if nested > 0 {
        return;
    }
    if let Some((paragraph, _)) = current {
        paragraph.push_str(text);
    }
}
