//! Dense passage/query embeddings, fixed at [`EMBEDDING_DIM`] per the
//! deployment-time decision recorded in DESIGN.md.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EMBEDDING_DIM: usize = 384;
pub const MAX_EMBED_CHARS: usize = 5_000;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_raw(&self, prefixed_text: &str) -> Result<Vec<f32>>;

    /// Returns `Ok(None)` on any embedding failure, since the component
    /// design requires downstream stages to skip rather than abort.
    async fn embed_passage(&self, text: &str) -> Result<Option<Vec<f32>>> {
        let truncated: String = text.chars().take(MAX_EMBED_CHARS).collect();
        match self.embed_raw(&format!("passage: {truncated}")).await {
            Ok(v) => Ok(Some(normalize(v))),
            Err(_) => Ok(None),
        }
    }

    async fn embed_query(&self, text: &str) -> Result<Option<Vec<f32>>> {
        let truncated: String = text.chars().take(MAX_EMBED_CHARS).collect();
        match self.embed_raw(&format!("query: {truncated}")).await {
            Ok(v) => Ok(Some(normalize(v))),
            Err(_) => Ok(None),
        }
    }
}

pub fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    v
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// HTTP-backed embedder pointed at a sentence-embedding service, mirroring the
/// summariser's reqwest client shape.
pub struct HttpEmbedder {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpEmbedder {
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

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed_raw(&self, prefixed_text: &str) -> Result<Vec<f32>> {
        let response: EmbedResponse = self
            .client
            .post(format!("{}/embed", self.endpoint))
            .json(&EmbedRequest { input: prefixed_text })
            .send()
            .await?
            .json()
            .await?;
        if response.embedding.len() != EMBEDDING_DIM {
            return Err(EmbeddingError::DimensionMismatch {
                expected: EMBEDDING_DIM,
                actual: response.embedding.len(),
            });
        }
        Ok(response.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_similarity_of_identical_vectors_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cosine_similarity_of_orthogonal_vectors_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-5);
    }

    #[test]
    fn normalize_produces_unit_vector() {
        let v = normalize(vec![3.0, 4.0]);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
