//! SQLite-backed chunk store: embeddings are bincode-serialised BLOBs and
//! nearest-neighbour search is a brute-force cosine scan in Rust, since
//! SQLite has no native vector index.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::{ChunkMatch, Result, VectorStore, VectorStoreError};
use crate::embedding::cosine_similarity;
use crate::repository::diesel_models::{ChunkRecord, NewChunk};
use crate::repository::diesel_pool::AsyncSqlitePool;
use crate::schema::document_chunks;

pub struct SqliteVectorStore {
    pool: AsyncSqlitePool,
}

impl SqliteVectorStore {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn upsert_chunk(
        &self,
        document_id: i32,
        chunk_index: i32,
        content: &str,
        document_title: &str,
        document_country: &str,
        embedding: &[f32],
    ) -> Result<()> {
        let mut conn = self.pool.get().await.map_err(|e| {
            VectorStoreError::Serialization(format!("connection error: {e}"))
        })?;
        let now = Utc::now().to_rfc3339();
        let bytes = bincode::serialize(embedding)
            .map_err(|e| VectorStoreError::Serialization(e.to_string()))?;
        let record = NewChunk {
            document_id,
            chunk_index,
            content,
            document_title,
            document_country,
            embedding: &bytes,
            created_at: &now,
        };
        diesel::insert_into(document_chunks::table)
            .values(&record)
            .on_conflict((document_chunks::document_id, document_chunks::chunk_index))
            .do_update()
            .set((
                document_chunks::content.eq(content),
                document_chunks::document_title.eq(document_title),
                document_chunks::document_country.eq(document_country),
                document_chunks::embedding.eq(&bytes),
            ))
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn delete_document_chunks(&self, document_id: i32) -> Result<()> {
        let mut conn = self.pool.get().await.map_err(|e| {
            VectorStoreError::Serialization(format!("connection error: {e}"))
        })?;
        diesel::delete(document_chunks::table.filter(document_chunks::document_id.eq(document_id)))
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn nearest(
        &self,
        query_embedding: &[f32],
        limit: usize,
        document_id: Option<i32>,
    ) -> Result<Vec<ChunkMatch>> {
        let mut conn = self.pool.get().await.map_err(|e| {
            VectorStoreError::Serialization(format!("connection error: {e}"))
        })?;
        let mut query = document_chunks::table.into_boxed();
        if let Some(document_id) = document_id {
            query = query.filter(document_chunks::document_id.eq(document_id));
        }
        let records: Vec<ChunkRecord> = query
            .select(ChunkRecord::as_select())
            .load(&mut conn)
            .await?;

        let mut scored: Vec<ChunkMatch> = records
            .into_iter()
            .filter_map(|r| {
                let embedding: Vec<f32> = bincode::deserialize(&r.embedding).ok()?;
                let similarity = cosine_similarity(query_embedding, &embedding);
                Some(ChunkMatch {
                    document_id: r.document_id,
                    chunk_index: r.chunk_index,
                    content: r.content,
                    document_title: r.document_title,
                    document_country: r.document_country,
                    similarity,
                })
            })
            .collect();
        scored.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }
}
