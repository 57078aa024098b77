//! Hybrid search over approved documents: keyword substring scan, semantic
//! nearest-neighbour over chunk embeddings, or both merged.

use std::sync::Arc;

use crate::embedding::Embedder;
use crate::models::Document;
use crate::repository::{BannedWordRepository, DocumentRepository, RepositoryError, SearchMode};
use crate::vector_store::VectorStore;

pub const MAX_SEARCH_TEXT_WORDS: usize = 1000;
const DEFAULT_RESULT_LIMIT: i64 = 20;
const SEMANTIC_CHUNK_OVERSAMPLE: usize = 3;
const SEMANTIC_SIMILARITY_FLOOR: f32 = 0.3;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("vector store error: {0}")]
    VectorStore(#[from] crate::vector_store::VectorStoreError),
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub document: Document,
    pub score: f32,
    pub matched_chunk: Option<String>,
}

pub struct SearchService {
    documents: Arc<DocumentRepository>,
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    banned_words: Arc<BannedWordRepository>,
}

impl SearchService {
    pub fn new(
        documents: Arc<DocumentRepository>,
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        banned_words: Arc<BannedWordRepository>,
    ) -> Self {
        Self { documents, vector_store, embedder, banned_words }
    }

    pub async fn search(&self, query: &str, mode: SearchMode, limit: i64) -> Result<Vec<SearchResult>> {
        let limit = if limit <= 0 { DEFAULT_RESULT_LIMIT } else { limit };
        let mut results = match mode {
            SearchMode::Keyword => self.keyword_search(query, limit).await?,
            SearchMode::Semantic => self.semantic_search(query, limit).await?,
            SearchMode::Hybrid => self.hybrid_search(query, limit).await?,
        };

        let banned = self.banned_word_list().await?;
        for result in &mut results {
            apply_post_processing(&mut result.document, &banned);
        }
        Ok(results)
    }

    async fn banned_word_list(&self) -> Result<Vec<String>> {
        Ok(self.banned_words.list().await?.into_iter().map(|b| b.word).collect())
    }

    async fn keyword_search(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let documents = self.documents.keyword_search(query, limit).await?;
        Ok(documents
            .into_iter()
            .map(|document| SearchResult { document, score: 0.0, matched_chunk: None })
            .collect())
    }

    async fn semantic_search(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let Some(query_embedding) = self.embedder.embed_query(query).await.ok().flatten() else {
            // Embedding service unavailable: degrade to keyword search rather
            // than returning nothing.
            return self.keyword_search(query, limit).await;
        };
        let matches = self
            .vector_store
            .nearest(&query_embedding, (limit as usize) * SEMANTIC_CHUNK_OVERSAMPLE, None)
            .await?;

        let mut seen = std::collections::HashSet::new();
        let mut results = Vec::new();
        for m in matches {
            if m.similarity < SEMANTIC_SIMILARITY_FLOOR {
                continue;
            }
            if !seen.insert(m.document_id) {
                continue;
            }
            let Some(document) = self.documents.get_approved(m.document_id).await? else {
                continue;
            };
            results.push(SearchResult { document, score: m.similarity, matched_chunk: Some(m.content) });
            if results.len() as i64 >= limit {
                break;
            }
        }
        Ok(results)
    }

    /// Unions semantic (score >= 0.3) and keyword (score 0) results,
    /// preferring the semantic entry on overlap, then orders by similarity
    /// descending (keyword entries sort last) and `created_at` descending.
    async fn hybrid_search(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let (keyword, semantic) = (
            self.keyword_search(query, limit).await?,
            self.semantic_search(query, limit).await?,
        );

        let mut merged: std::collections::HashMap<i32, SearchResult> = std::collections::HashMap::new();
        for r in keyword {
            merged.insert(r.document.id, r);
        }
        for r in semantic {
            merged.insert(r.document.id, r);
        }
        let mut results: Vec<SearchResult> = merged.into_values().collect();
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.document.created_at.cmp(&a.document.created_at))
        });
        results.truncate(limit as usize);
        Ok(results)
    }
}

/// Applies the post-processing every search/read response must carry:
/// banned-word redaction of OCR text and tags, English-translation
/// promotion to the visible `ocr_text`, and the translation/script flags.
pub fn apply_post_processing(document: &mut Document, banned_words: &[String]) {
    if let Some(text) = &document.ocr_text {
        document.ocr_text = Some(redact_banned_words(text, banned_words));
    }
    if let Some(text) = &document.ocr_text_original {
        document.ocr_text_original = Some(redact_banned_words(text, banned_words));
    }
    if let Some(text) = &document.ocr_text_english {
        document.ocr_text_english = Some(redact_banned_words(text, banned_words));
    }
    document.generated_tags.retain(|tag| !tag_is_banned(tag, banned_words));

    if document.has_english_translation() {
        document.ocr_text = document.ocr_text_english.clone();
    }
}

fn tag_is_banned(tag: &str, banned_words: &[String]) -> bool {
    banned_words.iter().any(|word| !word.is_empty() && tag.eq_ignore_ascii_case(word))
}

/// Builds the `search_text` column: the preferred OCR text, whitespace
/// collapsed and capped at `max_words`, so keyword search doesn't scan
/// unbounded megabyte-scale OCR dumps.
pub fn build_search_text(preferred_text: &str, max_words: usize) -> String {
    preferred_text.split_whitespace().take(max_words).collect::<Vec<_>>().join(" ")
}

/// Redacts any banned word (whole-word, case-insensitive) from `text` before
/// it is shown back to an anonymous reader, matching the redaction applied
/// to tags.
pub fn redact_banned_words(text: &str, banned: &[String]) -> String {
    if banned.is_empty() {
        return text.to_string();
    }
    let mut redacted = text.to_string();
    for word in banned {
        if word.is_empty() {
            continue;
        }
        if let Ok(re) = regex::Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))) {
            redacted = re.replace_all(&redacted, "[redacted]").into_owned();
        }
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_search_text_caps_word_count() {
        let text = (0..2000).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let result = build_search_text(&text, MAX_SEARCH_TEXT_WORDS);
        assert_eq!(result.split_whitespace().count(), MAX_SEARCH_TEXT_WORDS);
    }

    #[test]
    fn redact_banned_words_replaces_whole_words_only() {
        let text = "The minister signed the document.";
        let redacted = redact_banned_words(text, &["minister".to_string()]);
        assert_eq!(redacted, "The [redacted] signed the document.");
    }

    #[test]
    fn redact_banned_words_is_case_insensitive() {
        let text = "MINISTER and minister both appear.";
        let redacted = redact_banned_words(text, &["minister".to_string()]);
        assert_eq!(redacted, "[redacted] and [redacted] both appear.");
    }

    fn sample_document() -> Document {
        Document {
            id: 1,
            title: "Title".into(),
            country: "X".into(),
            state: "Y".into(),
            description: None,
            document_language: "french".into(),
            ocr_text_original: Some("Le ministre a signe".into()),
            ocr_text_english: Some("The minister signed".into()),
            file_path: "documents/a.pdf".into(),
            file_url: "/download/1".into(),
            original_filename: "a.pdf".into(),
            file_size: 100,
            content_type: "application/pdf".into(),
            ocr_text: Some("Le ministre a signe".into()),
            generated_tags: vec!["minister".into(), "treaty".into()],
            search_text: None,
            embedding: None,
            ai_summary: None,
            status: crate::models::DocumentStatus::Approved,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
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

    #[test]
    fn post_processing_promotes_english_translation_to_visible_text() {
        let mut doc = sample_document();
        apply_post_processing(&mut doc, &[]);
        assert_eq!(doc.ocr_text.as_deref(), Some("The minister signed"));
    }

    #[test]
    fn post_processing_redacts_visible_text_and_translation_identically() {
        let mut doc = sample_document();
        apply_post_processing(&mut doc, &["minister".to_string()]);
        assert_eq!(doc.ocr_text, doc.ocr_text_english);
        assert!(doc.ocr_text.unwrap().contains("[redacted]"));
    }

    #[test]
    fn post_processing_filters_banned_tags() {
        let mut doc = sample_document();
        apply_post_processing(&mut doc, &["minister".to_string()]);
        assert_eq!(doc.generated_tags, vec!["treaty".to_string()]);
    }
}
