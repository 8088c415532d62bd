//! Plain-text extraction from acquired document payloads.

use tracing::{debug, error};

use crate::contract::{AcquiredContent, ExtractError, TextExtractor};

/// Extractor for PDF payloads, including page captures (which carry a text
/// layer of their own).
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, content: &AcquiredContent) -> Result<String, ExtractError> {
        let text = pdf_extract::extract_text_from_mem(&content.bytes).map_err(|e| {
            error!(error = %e, kind = ?content.kind, "Failed to parse document payload");
            ExtractError::Parse(e.to_string())
        })?;
        if text.trim().is_empty() {
            // Scan-only documents parse fine but yield nothing to work with.
            return Err(ExtractError::NoTextLayer);
        }
        debug!(chars = text.len(), kind = ?content.kind, "Extracted text from payload");
        Ok(text)
    }
}
