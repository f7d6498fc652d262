//! Text extraction — turns uploaded PDF bytes into normalized plain text.
//!
//! The extractor is a capability: `AppState` holds an `Option<Arc<dyn
//! TextExtractor>>`, and a build without the `pdf` feature carries `None`,
//! which handlers report as EXTRACTION_UNAVAILABLE.

use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("not a valid PDF document: {0}")]
    InvalidDocument(String),
}

/// Extracts plain text from an uploaded document.
///
/// Contract: page texts concatenated with newlines, runs of three or more
/// consecutive newlines collapsed to exactly two, leading/trailing
/// whitespace trimmed.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Returns the extractor this build provides, if any.
pub fn default_extractor() -> Option<Arc<dyn TextExtractor>> {
    #[cfg(feature = "pdf")]
    {
        Some(Arc::new(PdfTextExtractor))
    }
    #[cfg(not(feature = "pdf"))]
    {
        None
    }
}

#[cfg(feature = "pdf")]
pub struct PdfTextExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::InvalidDocument(e.to_string()))?;
        Ok(normalize_extracted_text(&text))
    }
}

/// Collapses runs of 3+ newlines to exactly two and trims the result.
/// PDF extraction tends to leave large vertical gaps between blocks.
fn normalize_extracted_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            run += 1;
            if run <= 2 {
                out.push(ch);
            }
        } else {
            run = 0;
            out.push(ch);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_long_newline_runs() {
        let input = "Page one\n\n\n\n\nPage two\n\n\nPage three";
        let out = normalize_extracted_text(input);
        assert_eq!(out, "Page one\n\nPage two\n\nPage three");
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn test_normalize_keeps_single_and_double_newlines() {
        let input = "line one\nline two\n\nline three";
        assert_eq!(normalize_extracted_text(input), input);
    }

    #[test]
    fn test_normalize_trims_surrounding_whitespace() {
        let input = "\n\n  Jane Doe\nSoftware Engineer  \n\n";
        let out = normalize_extracted_text(input);
        assert_eq!(out, "Jane Doe\nSoftware Engineer");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize_extracted_text(""), "");
        assert_eq!(normalize_extracted_text("\n\n\n"), "");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_extract_rejects_non_pdf_bytes() {
        let result = PdfTextExtractor.extract(b"this is not a pdf document");
        assert!(matches!(result, Err(ExtractError::InvalidDocument(_))));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_default_extractor_present_with_pdf_feature() {
        assert!(default_extractor().is_some());
    }
}
