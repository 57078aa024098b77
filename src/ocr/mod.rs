//! OCR backend abstraction and language-pack selection.

mod tesseract;

pub use tesseract::TesseractBackend;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("backend unavailable: {0}")]
    BackendNotAvailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ocr failed: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, OcrError>;

#[derive(Debug, Clone)]
pub struct OcrResult {
    pub text: String,
    pub confidence: Option<f32>,
    pub backend: &'static str,
    pub processing_time_ms: u64,
}

#[async_trait]
pub trait OcrBackend: Send + Sync {
    fn backend_type(&self) -> &'static str;
    async fn is_available(&self) -> bool;
    fn availability_hint(&self) -> String;
    async fn ocr_image(&self, image_bytes: &[u8], language: &str) -> Result<OcrResult>;
    async fn ocr_pdf_page(&self, pdf_bytes: &[u8], page: u32, language: &str) -> Result<OcrResult>;

    /// OCRs an entire document (image or PDF, up to the first 10 pages),
    /// concatenating page texts with blank-line separators. Returns an empty
    /// string rather than erroring when the backend is unavailable or the
    /// content type isn't recognised, since OCR failure must not abort the
    /// pipeline (see the component design's translation/OCR degrade policy).
    async fn ocr_document(&self, bytes: &[u8], content_type: &str, language: &str) -> Result<String> {
        let lang = resolve_language_pack(language);
        if content_type == "application/pdf" {
            let mut pages = Vec::new();
            for page in 1..=MAX_OCR_PAGES {
                match self.ocr_pdf_page(bytes, page, &lang).await {
                    Ok(result) if !result.text.trim().is_empty() => pages.push(result.text),
                    Ok(_) => break,
                    Err(_) if page == 1 => return Ok(String::new()),
                    Err(_) => break,
                }
            }
            Ok(pages.join("\n\n"))
        } else if content_type.starts_with("image/") {
            Ok(self.ocr_image(bytes, &lang).await?.text)
        } else {
            // Non-image/PDF content (docx/csv/plain text) bypasses OCR; the
            // sanitiser already rendered it to text-bearing PDF or the raw
            // text is used directly by the caller.
            Ok(String::new())
        }
    }
}

pub const MAX_OCR_PAGES: u32 = 10;

/// Maps a declared document language to a Tesseract language-pack code,
/// covering the common aliasing cases the archive has seen in practice.
pub fn resolve_language_pack(language: &str) -> String {
    match language.to_lowercase().as_str() {
        "english" | "en" => "eng",
        "french" | "fr" => "fra",
        "spanish" | "es" => "spa",
        "arabic" | "ar" => "ara",
        "mandarin" | "chinese" | "chinese_simplified" | "zh" => "chi_sim",
        "burmese" | "myanmar" => "mya",
        "russian" | "ru" => "rus",
        "portuguese" | "pt" => "por",
        other if !other.is_empty() => other,
        _ => "eng",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_common_language_variants() {
        assert_eq!(resolve_language_pack("mandarin"), "chi_sim");
        assert_eq!(resolve_language_pack("burmese"), "mya");
        assert_eq!(resolve_language_pack("english"), "eng");
    }

    #[test]
    fn falls_back_to_english_for_empty_language() {
        assert_eq!(resolve_language_pack(""), "eng");
    }
}
