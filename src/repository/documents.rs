//! Catalog store operations over the `documents` table.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{DocumentRecord, NewDocument};
use super::diesel_pool::AsyncSqlitePool;
use super::{parse_datetime, Result, RepositoryError};
use crate::models::{Document, DocumentStatus};
use crate::schema::documents;

#[derive(Debug, Default, Clone)]
pub struct DocumentFilter {
    pub country: Option<String>,
    pub state: Option<String>,
    pub status: Option<DocumentStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Keyword,
    Semantic,
    Hybrid,
}

pub struct DocumentRepository {
    pool: AsyncSqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewDocumentInput<'_>) -> Result<Document> {
        let now = Utc::now().to_rfc3339();
        let mut conn = self.pool.get().await?;
        let record = NewDocument {
            title: new.title,
            country: new.country,
            state: new.state,
            description: new.description,
            document_language: new.document_language,
            file_path: new.file_path,
            file_url: new.file_url,
            original_filename: new.original_filename,
            file_size: new.file_size,
            content_type: new.content_type,
            generated_tags: "[]",
            status: DocumentStatus::Pending.as_str(),
            created_at: &now,
            updated_at: &now,
        };
        let id: i32 = diesel::insert_into(documents::table)
            .values(&record)
            .returning(documents::id)
            .get_result(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        self.get(id).await?.ok_or_else(|| {
            RepositoryError::NotFound(format!("document {id} missing immediately after insert"))
        })
    }

    pub async fn get(&self, id: i32) -> Result<Option<Document>> {
        let mut conn = self.pool.get().await?;
        let record = documents::table
            .find(id)
            .select(DocumentRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepositoryError::Database)?;
        Ok(record.map(from_record))
    }

    pub async fn get_approved(&self, id: i32) -> Result<Option<Document>> {
        Ok(self
            .get(id)
            .await?
            .filter(|d| matches!(d.status, DocumentStatus::Approved | DocumentStatus::Processed)))
    }

    pub async fn list_recent(
        &self,
        filter: &DocumentFilter,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Document>> {
        let mut conn = self.pool.get().await?;
        let mut query = documents::table
            .filter(documents::status.eq_any([
                DocumentStatus::Approved.as_str(),
                DocumentStatus::Processed.as_str(),
            ]))
            .into_boxed();
        if let Some(country) = &filter.country {
            query = query.filter(documents::country.eq(country.clone()));
        }
        if let Some(state) = &filter.state {
            query = query.filter(documents::state.eq(state.clone()));
        }
        let offset = (page.max(1) - 1) * per_page;
        let records = query
            .order(documents::created_at.desc())
            .limit(per_page)
            .offset(offset)
            .select(DocumentRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(records.into_iter().map(from_record).collect())
    }

    /// Case-insensitive substring scan, used when the backend lacks native
    /// full-text search or as the keyword half of hybrid search.
    pub async fn keyword_search(&self, q: &str, limit: i64) -> Result<Vec<Document>> {
        let mut conn = self.pool.get().await?;
        let pattern = format!("%{}%", q.replace('%', "").replace('_', ""));
        let records = documents::table
            .filter(documents::status.eq_any([
                DocumentStatus::Approved.as_str(),
                DocumentStatus::Processed.as_str(),
            ]))
            .filter(
                documents::title
                    .like(pattern.clone())
                    .or(documents::ocr_text.like(pattern.clone()))
                    .or(documents::country.like(pattern.clone()))
                    .or(documents::state.like(pattern.clone()))
                    .or(documents::search_text.like(pattern)),
            )
            .order(documents::created_at.desc())
            .limit(limit)
            .select(DocumentRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(records.into_iter().map(from_record).collect())
    }

    pub async fn list_with_embeddings(&self, limit: i64) -> Result<Vec<Document>> {
        let mut conn = self.pool.get().await?;
        let records = documents::table
            .filter(documents::status.eq_any([
                DocumentStatus::Approved.as_str(),
                DocumentStatus::Processed.as_str(),
            ]))
            .filter(documents::embedding.is_not_null())
            .limit(limit)
            .select(DocumentRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(records.into_iter().map(from_record).collect())
    }

    pub async fn approve(&self, id: i32, approved_by: &str) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        let updated = diesel::update(documents::table.find(id))
            .set((
                documents::status.eq(DocumentStatus::Approved.as_str()),
                documents::approved_at.eq(&now),
                documents::approved_by.eq(approved_by),
                documents::rejected_at.eq::<Option<String>>(None),
                documents::rejected_by.eq::<Option<String>>(None),
                documents::rejection_reason.eq::<Option<String>>(None),
                documents::updated_at.eq(&now),
            ))
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        if updated == 0 {
            return Err(RepositoryError::NotFound(format!("document {id}")));
        }
        Ok(())
    }

    pub async fn reject(&self, id: i32, rejected_by: &str, reason: &str) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        let updated = diesel::update(documents::table.find(id))
            .set((
                documents::status.eq(DocumentStatus::Rejected.as_str()),
                documents::rejected_at.eq(&now),
                documents::rejected_by.eq(rejected_by),
                documents::rejection_reason.eq(reason),
                documents::approved_at.eq::<Option<String>>(None),
                documents::updated_at.eq(&now),
            ))
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        if updated == 0 {
            return Err(RepositoryError::NotFound(format!("document {id}")));
        }
        Ok(())
    }

    pub async fn mark_processed(
        &self,
        id: i32,
        ocr_text_original: Option<&str>,
        ocr_text_english: Option<&str>,
        ocr_text: Option<&str>,
        search_text: Option<&str>,
        tags_json: &str,
        summary: Option<&str>,
        embedding: Option<&[u8]>,
    ) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        diesel::update(documents::table.find(id))
            .set((
                documents::ocr_text_original.eq(ocr_text_original),
                documents::ocr_text_english.eq(ocr_text_english),
                documents::ocr_text.eq(ocr_text),
                documents::search_text.eq(search_text),
                documents::generated_tags.eq(tags_json),
                documents::ai_summary.eq(summary),
                documents::embedding.eq(embedding),
                documents::status.eq(DocumentStatus::Processed.as_str()),
                documents::processed_at.eq(&now),
                documents::updated_at.eq(&now),
            ))
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(())
    }

    pub async fn increment_view_count(&self, id: i32) -> Result<()> {
        let mut conn = self.pool.get().await?;
        diesel::update(documents::table.find(id))
            .set(documents::view_count.eq(documents::view_count + 1))
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let mut conn = self.pool.get().await?;
        diesel::delete(documents::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(())
    }
}

pub struct NewDocumentInput<'a> {
    pub title: &'a str,
    pub country: &'a str,
    pub state: &'a str,
    pub description: Option<&'a str>,
    pub document_language: &'a str,
    pub file_path: &'a str,
    pub file_url: &'a str,
    pub original_filename: &'a str,
    pub file_size: i64,
    pub content_type: &'a str,
}

fn from_record(r: DocumentRecord) -> Document {
    let tags: Vec<String> = serde_json::from_str(&r.generated_tags).unwrap_or_default();
    let embedding = r.embedding.as_deref().and_then(decode_embedding);
    Document {
        id: r.id,
        title: r.title,
        country: r.country,
        state: r.state,
        description: r.description,
        document_language: r.document_language,
        ocr_text_original: r.ocr_text_original,
        ocr_text_english: r.ocr_text_english,
        file_path: r.file_path,
        file_url: r.file_url,
        original_filename: r.original_filename,
        file_size: r.file_size,
        content_type: r.content_type,
        ocr_text: r.ocr_text,
        generated_tags: tags,
        search_text: r.search_text,
        embedding,
        ai_summary: r.ai_summary,
        status: DocumentStatus::from_str(&r.status).unwrap_or(DocumentStatus::Pending),
        created_at: parse_datetime(&r.created_at),
        updated_at: parse_datetime(&r.updated_at),
        processed_at: r.processed_at.as_deref().map(parse_datetime),
        approved_at: r.approved_at.as_deref().map(parse_datetime),
        rejected_at: r.rejected_at.as_deref().map(parse_datetime),
        approved_by: r.approved_by,
        rejected_by: r.rejected_by,
        rejection_reason: r.rejection_reason,
        view_count: r.view_count,
        hidden_from_top: r.hidden_from_top,
    }
}

fn decode_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
    bincode::deserialize(bytes).ok()
}
