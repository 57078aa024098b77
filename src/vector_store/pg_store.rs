//! PostgreSQL-backed chunk store using the `pgvector` extension: embeddings
//! are stored as native `vector` columns and nearest-neighbour search uses
//! the `<=>` cosine-distance operator instead of a Rust-side scan.

use async_trait::async_trait;
use diesel::sql_types::{Integer, Text};
use diesel::prelude::*;
use pgvector::Vector;

use super::{ChunkMatch, Result, VectorStore, VectorStoreError};

/// Connects directly via a raw connection string rather than the SQLite
/// pool, since the chunk table lives in a separate PostgreSQL database in
/// deployments that enable the `postgres` feature.
pub struct PgVectorStore {
    database_url: String,
}

impl PgVectorStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self { database_url: database_url.into() }
    }

    async fn connect(&self) -> Result<diesel_async::AsyncPgConnection> {
        use diesel_async::AsyncConnection;
        diesel_async::AsyncPgConnection::establish(&self.database_url)
            .await
            .map_err(|e| VectorStoreError::Serialization(format!("connection error: {e}")))
    }
}

#[derive(QueryableByName)]
struct MatchRow {
    #[diesel(sql_type = Integer)]
    document_id: i32,
    #[diesel(sql_type = Integer)]
    chunk_index: i32,
    #[diesel(sql_type = Text)]
    content: String,
    #[diesel(sql_type = Text)]
    document_title: String,
    #[diesel(sql_type = Text)]
    document_country: String,
    #[diesel(sql_type = diesel::sql_types::Float)]
    similarity: f32,
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn upsert_chunk(
        &self,
        document_id: i32,
        chunk_index: i32,
        content: &str,
        document_title: &str,
        document_country: &str,
        embedding: &[f32],
    ) -> Result<()> {
        use diesel_async::RunQueryDsl;
        let mut conn = self.connect().await?;
        let vector = Vector::from(embedding.to_vec());
        diesel::sql_query(
            "INSERT INTO document_chunks (document_id, chunk_index, content, document_title, document_country, embedding, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, now()) \
             ON CONFLICT (document_id, chunk_index) DO UPDATE SET \
             content = EXCLUDED.content, document_title = EXCLUDED.document_title, \
             document_country = EXCLUDED.document_country, embedding = EXCLUDED.embedding",
        )
        .bind::<Integer, _>(document_id)
        .bind::<Integer, _>(chunk_index)
        .bind::<Text, _>(content)
        .bind::<Text, _>(document_title)
        .bind::<Text, _>(document_country)
        .bind::<pgvector::sql_types::Vector, _>(vector)
        .execute(&mut conn)
        .await?;
        Ok(())
    }

    async fn delete_document_chunks(&self, document_id: i32) -> Result<()> {
        use diesel_async::RunQueryDsl;
        let mut conn = self.connect().await?;
        diesel::sql_query("DELETE FROM document_chunks WHERE document_id = $1")
            .bind::<Integer, _>(document_id)
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
        use diesel_async::RunQueryDsl;
        let mut conn = self.connect().await?;
        let vector = Vector::from(query_embedding.to_vec());
        let rows: Vec<MatchRow> = if let Some(document_id) = document_id {
            diesel::sql_query(
                "SELECT document_id, chunk_index, content, document_title, document_country, \
                 1 - (embedding <=> $1) AS similarity FROM document_chunks \
                 WHERE document_id = $2 ORDER BY embedding <=> $1 LIMIT $3",
            )
            .bind::<pgvector::sql_types::Vector, _>(vector)
            .bind::<Integer, _>(document_id)
            .bind::<diesel::sql_types::BigInt, _>(limit as i64)
            .load(&mut conn)
            .await?
        } else {
            diesel::sql_query(
                "SELECT document_id, chunk_index, content, document_title, document_country, \
                 1 - (embedding <=> $1) AS similarity FROM document_chunks \
                 ORDER BY embedding <=> $1 LIMIT $2",
            )
            .bind::<pgvector::sql_types::Vector, _>(vector)
            .bind::<diesel::sql_types::BigInt, _>(limit as i64)
            .load(&mut conn)
            .await?
        };
        Ok(rows
            .into_iter()
            .map(|r| ChunkMatch {
                document_id: r.document_id,
                chunk_index: r.chunk_index,
                content: r.content,
                document_title: r.document_title,
                document_country: r.document_country,
                similarity: r.similarity,
            })
            .collect())
    }
}
