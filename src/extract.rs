//! Text extraction for uploaded deed documents.
//!
//! Uploads arrive as PDF bytes or plain UTF-8 text; this module returns plain
//! text for the extraction pipeline. Extraction never panics, a malformed file
//! surfaces as an error for the handler to map onto the HTTP contract.

/// Supported MIME types for upload extraction.
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";

/// Extraction error. Pipeline maps this onto a client-visible 400.
#[derive(Debug)]
pub enum ExtractError {
    UnsupportedContentType(String),
    Pdf(String),
    InvalidUtf8,
    EmptyDocument,
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::UnsupportedContentType(ct) => {
                write!(f, "unsupported content-type: {}", ct)
            }
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
            ExtractError::InvalidUtf8 => write!(f, "text upload is not valid UTF-8"),
            ExtractError::EmptyDocument => write!(f, "document contains no extractable text"),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extracts plain text from uploaded bytes.
///
/// Filenames ending in `.pdf` are treated as PDF regardless of the declared
/// content type, since browsers are inconsistent about multipart part types.
pub fn extract_text(
    bytes: &[u8],
    content_type: &str,
    filename: &str,
) -> Result<String, ExtractError> {
    let text = if filename.to_lowercase().ends_with(".pdf") || content_type == MIME_PDF {
        extract_pdf(bytes)?
    } else if content_type.starts_with(MIME_TEXT) || content_type.is_empty() {
        String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::InvalidUtf8)?
    } else {
        return Err(ExtractError::UnsupportedContentType(
            content_type.to_string(),
        ));
    };

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_text(b"SALE DEED executed on 15-03-2024", MIME_TEXT, "deed.txt")
            .expect("plain text should extract");
        assert!(text.contains("SALE DEED"));
    }

    #[test]
    fn test_empty_content_type_defaults_to_text() {
        let text = extract_text(b"hello", "", "deed.txt").expect("should extract");
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_unsupported_content_type() {
        let err = extract_text(b"...", "image/png", "scan.png").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedContentType(_)));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = extract_text(&[0xff, 0xfe, 0x80], MIME_TEXT, "deed.txt").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidUtf8));
    }

    #[test]
    fn test_empty_document_rejected() {
        let err = extract_text(b"   \n\t ", MIME_TEXT, "deed.txt").unwrap_err();
        assert!(matches!(err, ExtractError::EmptyDocument));
    }

    #[test]
    fn test_pdf_extension_forces_pdf_path() {
        // Not a valid PDF, so the PDF parser must reject it rather than the
        // bytes being passed through as text.
        let err = extract_text(b"not a pdf", "", "deed.pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
