//! Translation to English, chunked to preserve paragraph boundaries and
//! bounded per the component design (≤4000 chars per chunk).

use async_trait::async_trait;
use thiserror::Error;

pub const CHUNK_CHAR_LIMIT: usize = 4000;
const LATIN_RATIO_FLOOR: f32 = 0.6;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translator unavailable: {0}")]
    Unavailable(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TranslateError>;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn is_available(&self) -> bool;
    async fn translate_chunk(&self, text: &str, source_language: &str) -> Result<String>;

    async fn translate_to_english(&self, text: &str, source_language: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let mut translated = String::new();
        for chunk in split_preserving_paragraphs(text, CHUNK_CHAR_LIMIT) {
            let piece = self.translate_chunk(&chunk, source_language).await?;
            if !translated.is_empty() {
                translated.push_str("\n\n");
            }
            translated.push_str(&piece);
        }
        Ok(translated)
    }
}

/// Splits `text` into chunks no longer than `limit` characters without
/// breaking paragraphs where avoidable.
pub fn split_preserving_paragraphs(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for paragraph in text.split("\n\n") {
        if current.len() + paragraph.len() + 2 > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        if paragraph.len() > limit {
            for piece in paragraph.as_bytes().chunks(limit) {
                chunks.push(String::from_utf8_lossy(piece).into_owned());
            }
        } else {
            current.push_str(paragraph);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

pub fn latin_ratio(text: &str) -> f32 {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return 1.0;
    }
    let latin = letters.iter().filter(|c| c.is_ascii_alphabetic()).count();
    latin as f32 / letters.len() as f32
}

pub fn looks_untranslated(text: &str) -> bool {
    text.trim().is_empty() || latin_ratio(text) < LATIN_RATIO_FLOOR
}

/// Identity translator used when no real translation backend is configured:
/// text passes through unchanged, matching the "english_text := original_text"
/// degrade path.
#[derive(Debug, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn is_available(&self) -> bool {
        true
    }

    async fn translate_chunk(&self, text: &str, _source_language: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Stateless HTTP translation backend, following the shape of the
/// summariser's Ollama-compatible HTTP client but pointed at a generic
/// translation endpoint.
pub struct HttpTranslator {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTranslator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[derive(serde::Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source: &'a str,
    target: &'static str,
}

#[derive(serde::Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn translate_chunk(&self, text: &str, source_language: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/translate", self.endpoint))
            .json(&TranslateRequest { text, source: source_language, target: "en" })
            .send()
            .await?
            .json::<TranslateResponse>()
            .await?;
        Ok(response.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_long_text_into_bounded_chunks() {
        let paragraph = "x".repeat(100);
        let text = vec![paragraph; 50].join("\n\n");
        let chunks = split_preserving_paragraphs(&text, CHUNK_CHAR_LIMIT);
        assert!(chunks.iter().all(|c| c.len() <= CHUNK_CHAR_LIMIT));
        assert!(!chunks.is_empty());
    }

    #[test]
    fn detects_non_latin_text_as_untranslated() {
        assert!(looks_untranslated("日本語のテキストです"));
        assert!(!looks_untranslated("This is English text"));
    }

    #[tokio::test]
    async fn identity_translator_passes_text_through() {
        let translator = IdentityTranslator;
        let result = translator.translate_to_english("bonjour", "french").await.unwrap();
        assert_eq!(result, "bonjour");
    }
}
