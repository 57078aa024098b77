//! Chunking and pgvector-style nearest-neighbour storage for document chunks.

mod sqlite_store;
#[cfg(feature = "postgres")]
mod pg_store;

pub use sqlite_store::SqliteVectorStore;
#[cfg(feature = "postgres")]
pub use pg_store::PgVectorStore;

use async_trait::async_trait;
use thiserror::Error;

pub const CHUNK_TARGET_CHARS: usize = 500;
pub const CHUNK_OVERLAP_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Debug, Clone)]
pub struct ChunkMatch {
    pub document_id: i32,
    pub chunk_index: i32,
    pub content: String,
    pub document_title: String,
    pub document_country: String,
    pub similarity: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    async fn upsert_chunk(
        &self,
        document_id: i32,
        chunk_index: i32,
        content: &str,
        document_title: &str,
        document_country: &str,
        embedding: &[f32],
    ) -> Result<()>;

    async fn delete_document_chunks(&self, document_id: i32) -> Result<()>;

    async fn nearest(
        &self,
        query_embedding: &[f32],
        limit: usize,
        document_id: Option<i32>,
    ) -> Result<Vec<ChunkMatch>>;
}

/// Splits the "Title:.../Description:.../Content:..." blob into ~500-char
/// paragraph-aligned chunks with a 50-char overlap tail, per the component
/// design's chunking algorithm.
pub fn chunk_text(title: &str, description: &Option<String>, content: &str) -> Vec<String> {
    let mut blob = format!("Title: {title}\n");
    if let Some(description) = description {
        if !description.is_empty() {
            blob.push_str(&format!("Description: {description}\n"));
        }
    }
    blob.push_str(&format!("Content: {content}"));

    let paragraphs: Vec<&str> = blob.split("\n\n").filter(|p| !p.trim().is_empty()).collect();
    let paragraphs = if paragraphs.is_empty() { vec![blob.as_str()] } else { paragraphs };

    let mut chunks = Vec::new();
    let mut current = String::new();
    for paragraph in paragraphs {
        if current.len() + paragraph.len() > CHUNK_TARGET_CHARS && !current.is_empty() {
            let tail: String = current
                .chars()
                .rev()
                .take(CHUNK_OVERLAP_CHARS)
                .collect::<String>()
                .chars()
                .rev()
                .collect();
            chunks.push(std::mem::take(&mut current));
            current = tail;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(paragraph);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_share_an_overlap_tail() {
        let content = (0..20).map(|i| format!("paragraph {i} with some words")).collect::<Vec<_>>().join("\n\n");
        let chunks = chunk_text("Title", &None, &content);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= CHUNK_TARGET_CHARS + CHUNK_OVERLAP_CHARS + 50);
        }
    }

    #[test]
    fn short_content_yields_a_single_chunk() {
        let chunks = chunk_text("Title", &None, "short content");
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("Title"));
        assert!(chunks[0].contains("short content"));
    }
}
