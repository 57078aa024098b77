use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a [`Document`].
///
/// Transitions: `Pending -> {Approved, Rejected}`, `Approved -> {Rejected, Processed}`,
/// `Rejected -> Approved` (clears rejection fields). `Processed` is terminal for the
/// pipeline but can still be re-rejected, which purges chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
    Processed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Processed => "processed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DocumentStatus::Pending),
            "approved" => Some(DocumentStatus::Approved),
            "rejected" => Some(DocumentStatus::Rejected),
            "processed" => Some(DocumentStatus::Processed),
            _ => None,
        }
    }
}

/// A single uploaded document and everything the pipeline has learned about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i32,
    pub title: String,
    pub country: String,
    pub state: String,
    pub description: Option<String>,
    pub document_language: String,
    pub ocr_text_original: Option<String>,
    pub ocr_text_english: Option<String>,
    pub file_path: String,
    pub file_url: String,
    pub original_filename: String,
    pub file_size: i64,
    pub content_type: String,
    pub ocr_text: Option<String>,
    pub generated_tags: Vec<String>,
    pub search_text: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub ai_summary: Option<String>,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub rejected_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub view_count: i32,
    pub hidden_from_top: bool,
}

impl Document {
    /// Whether `language` is English, case-insensitively.
    pub fn is_english(language: &str) -> bool {
        language.eq_ignore_ascii_case("english")
    }

    /// The text search and display should prefer: English translation when the
    /// document isn't in English and a translation exists, otherwise the combined
    /// OCR text.
    pub fn preferred_ocr_text(&self) -> Option<&str> {
        if !Self::is_english(&self.document_language) {
            if let Some(english) = &self.ocr_text_english {
                if !english.is_empty() {
                    return Some(english);
                }
            }
        }
        self.ocr_text.as_deref()
    }

    pub fn has_english_translation(&self) -> bool {
        !Self::is_english(&self.document_language)
            && self
                .ocr_text_english
                .as_ref()
                .is_some_and(|t| !t.is_empty())
    }

    /// Whether the document's declared language is Arabic, surfaced so
    /// readers know to expect right-to-left original text alongside the
    /// promoted English translation.
    pub fn has_arabic_text(&self) -> bool {
        self.document_language.eq_ignore_ascii_case("arabic")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::Approved,
            DocumentStatus::Rejected,
            DocumentStatus::Processed,
        ] {
            assert_eq!(DocumentStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_string_is_none() {
        assert!(DocumentStatus::from_str("archived").is_none());
    }

    #[test]
    fn preferred_text_prefers_english_translation() {
        let mut doc = sample_document();
        doc.document_language = "french".into();
        doc.ocr_text = Some("Bonjour".into());
        doc.ocr_text_english = Some("Hello".into());
        assert_eq!(doc.preferred_ocr_text(), Some("Hello"));
        assert!(doc.has_english_translation());
    }

    #[test]
    fn preferred_text_falls_back_for_english_documents() {
        let mut doc = sample_document();
        doc.document_language = "english".into();
        doc.ocr_text = Some("Hello".into());
        doc.ocr_text_english = None;
        assert_eq!(doc.preferred_ocr_text(), Some("Hello"));
        assert!(!doc.has_english_translation());
    }

    fn sample_document() -> Document {
        Document {
            id: 1,
            title: "Title".into(),
            country: "X".into(),
            state: "Y".into(),
            description: None,
            document_language: "english".into(),
            ocr_text_original: None,
            ocr_text_english: None,
            file_path: "documents/a.pdf".into(),
            file_url: "/download/1".into(),
            original_filename: "a.pdf".into(),
            file_size: 100,
            content_type: "application/pdf".into(),
            ocr_text: None,
            generated_tags: vec![],
            search_text: None,
            embedding: None,
            ai_summary: None,
            status: DocumentStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            processed_at: None,
            approved_at: None,
            rejected_at: None,
            approved_by: None,
            rejected_by: None,
            rejection_reason: None,
            view_count: 0,
            hidden_from_top: false,
        }
    }
}
