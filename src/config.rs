//! Environment-driven settings, assembled with `dotenvy` + typed defaults.
//! The surface here is small enough that the teacher's layered `prefer`
//! config machinery would be overkill; see DESIGN.md for that decision.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub documents_dir: PathBuf,
    pub bind_addr: String,
    pub ocr: OcrSettings,
    pub translate: TranslateSettings,
    pub embedding: EmbeddingSettings,
    pub summariser: crate::summariser::SummariserConfig,
    pub max_upload_bytes: u64,
    pub captcha_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub default_language: String,
}

#[derive(Debug, Clone)]
pub struct TranslateSettings {
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub endpoint: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://archive.db".into(),
            documents_dir: PathBuf::from("./data/documents"),
            bind_addr: "0.0.0.0:8080".into(),
            ocr: OcrSettings { default_language: "english".into() },
            translate: TranslateSettings { endpoint: None },
            embedding: EmbeddingSettings { endpoint: None },
            summariser: crate::summariser::SummariserConfig::default(),
            max_upload_bytes: crate::sanitiser::MAX_UPLOAD_BYTES,
            captcha_secret: None,
        }
    }
}

impl Settings {
    /// Loads `.env` (if present) then overlays environment variables onto
    /// the typed defaults above.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let mut summariser = defaults.summariser.clone();
        if let Ok(endpoint) = env::var("SUMMARISER_ENDPOINT") {
            summariser.endpoint = endpoint;
        }
        if let Ok(model) = env::var("SUMMARISER_MODEL") {
            summariser.model = model;
        }
        if let Ok(enabled) = env::var("SUMMARISER_ENABLED") {
            summariser.enabled = enabled != "false" && enabled != "0";
        }

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            documents_dir: env::var("DOCUMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.documents_dir),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            ocr: OcrSettings {
                default_language: env::var("OCR_DEFAULT_LANGUAGE")
                    .unwrap_or(defaults.ocr.default_language),
            },
            translate: TranslateSettings { endpoint: env::var("TRANSLATE_ENDPOINT").ok() },
            embedding: EmbeddingSettings { endpoint: env::var("EMBEDDING_ENDPOINT").ok() },
            summariser,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            captcha_secret: env::var("CAPTCHA_SECRET").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert!(settings.database_url.starts_with("sqlite://"));
        assert_eq!(settings.max_upload_bytes, crate::sanitiser::MAX_UPLOAD_BYTES);
    }
}
