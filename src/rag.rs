//! Retrieval-augmented answering: embed the question, pull the nearest
//! approved chunks, hand them to the summariser's LLM client as grounding
//! context, and log the exchange for audit.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::embedding::Embedder;
use crate::repository::{DocumentRepository, RagQueryRepository, RepositoryError};
use crate::summariser::Summariser;
use crate::vector_store::VectorStore;

const TOP_K: usize = 5;
const STOCK_NO_DOCUMENTS_ANSWER: &str =
    "No relevant documents were found in the archive for this question.";
const STOCK_FAILURE_ANSWER: &str =
    "The archive could not produce an answer for this question right now.";
const SYSTEM_INSTRUCTION: &str =
    "Answer only from the provided context. Cite the documents you drew from by title.";

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("vector store error: {0}")]
    VectorStore(#[from] crate::vector_store::VectorStoreError),
}

pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Debug, Clone, Copy)]
pub enum RagScope {
    Global,
    Document(i32),
}

#[derive(Debug, Clone, Serialize)]
pub struct RagSource {
    pub document_id: i32,
    pub document_title: String,
    pub country: String,
    pub chunk_preview: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RagAnswer {
    pub answer: String,
    pub sources: Vec<RagSource>,
    pub confidence: f32,
    pub response_time_ms: i64,
}

pub struct RagService {
    documents: Arc<DocumentRepository>,
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    summariser: Arc<Summariser>,
    query_log: Arc<RagQueryRepository>,
}

impl RagService {
    pub fn new(
        documents: Arc<DocumentRepository>,
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        summariser: Arc<Summariser>,
        query_log: Arc<RagQueryRepository>,
    ) -> Self {
        Self { documents, vector_store, embedder, summariser, query_log }
    }

    pub async fn answer(&self, question: &str, scope: RagScope) -> Result<RagAnswer> {
        let started = Instant::now();
        let result = self.answer_inner(question, scope).await;
        let elapsed_ms = started.elapsed().as_millis() as i64;

        let answer = result.unwrap_or_else(|_| RagAnswer {
            answer: STOCK_FAILURE_ANSWER.to_string(),
            sources: Vec::new(),
            confidence: 0.0,
            response_time_ms: elapsed_ms,
        });

        let document_scope = match scope {
            RagScope::Global => None,
            RagScope::Document(id) => Some(id),
        };
        self.query_log
            .log(
                question,
                Some(&answer.answer),
                Some(answer.confidence),
                Some(answer.sources.len() as i32),
                Some(answer.response_time_ms as i32),
                document_scope,
            )
            .await?;
        Ok(answer)
    }

    async fn answer_inner(&self, question: &str, scope: RagScope) -> Result<RagAnswer> {
        let started = Instant::now();
        let Some(query_embedding) = self.embedder.embed_query(question).await.ok().flatten() else {
            return Ok(no_documents_answer(started));
        };

        let scope_document_id = match scope {
            RagScope::Global => None,
            RagScope::Document(id) => Some(id),
        };
        let matches = self.vector_store.nearest(&query_embedding, TOP_K, scope_document_id).await?;

        let mut retained = Vec::new();
        for m in matches {
            if self.documents.get_approved(m.document_id).await?.is_some() {
                retained.push(m);
            }
            if retained.len() >= TOP_K {
                break;
            }
        }

        if retained.is_empty() {
            return Ok(no_documents_answer(started));
        }

        let mut prompt = format!("{SYSTEM_INSTRUCTION}\n\n");
        for m in &retained {
            prompt.push_str(&format!(
                "Document: {} (Country: {})\nContent: {}\n\n",
                m.document_title, m.document_country, m.content
            ));
        }
        prompt.push_str(&format!("Question: {question}"));

        let answer_text = self
            .summariser
            .summarise("Archive question", &prompt)
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| STOCK_FAILURE_ANSWER.to_string());

        let confidence = (0.3 + 0.1 * retained.len() as f32).min(0.9);
        let sources = retained
            .into_iter()
            .map(|m| RagSource {
                document_id: m.document_id,
                document_title: m.document_title,
                country: m.document_country,
                chunk_preview: m.content.chars().take(200).collect(),
            })
            .collect();

        Ok(RagAnswer {
            answer: answer_text,
            sources,
            confidence,
            response_time_ms: started.elapsed().as_millis() as i64,
        })
    }
}

fn no_documents_answer(started: Instant) -> RagAnswer {
    RagAnswer {
        answer: STOCK_NO_DOCUMENTS_ANSWER.to_string(),
        sources: Vec::new(),
        confidence: 0.0,
        response_time_ms: started.elapsed().as_millis() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_caps_at_point_nine() {
        let confidence = (0.3 + 0.1 * 20_f32).min(0.9);
        assert_eq!(confidence, 0.9);
    }

    #[test]
    fn confidence_scales_with_retained_chunk_count() {
        let one = (0.3 + 0.1 * 1_f32).min(0.9);
        let three = (0.3 + 0.1 * 3_f32).min(0.9);
        assert!(three > one);
    }
}
