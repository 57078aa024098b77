//! Diesel row <-> domain model mapping.

use crate::schema;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentRecord {
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
    pub generated_tags: String,
    pub search_text: Option<String>,
    pub embedding: Option<Vec<u8>>,
    pub ai_summary: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub processed_at: Option<String>,
    pub approved_at: Option<String>,
    pub rejected_at: Option<String>,
    pub approved_by: Option<String>,
    pub rejected_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub view_count: i32,
    pub hidden_from_top: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schema::documents)]
pub struct NewDocument<'a> {
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
    pub generated_tags: &'a str,
    pub status: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::jobs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct JobRecord {
    pub id: i32,
    pub document_id: i32,
    pub job_type: String,
    pub status: String,
    pub priority: i32,
    pub current_step: Option<String>,
    pub progress_percent: i32,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub max_retries: i32,
    pub created_at: String,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub failed_at: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schema::jobs)]
pub struct NewJob<'a> {
    pub document_id: i32,
    pub job_type: &'a str,
    pub status: &'a str,
    pub priority: i32,
    pub created_at: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CommentRecord {
    pub id: i32,
    pub document_id: i32,
    pub parent_comment_id: Option<i32>,
    pub comment_text: String,
    pub session_hash: String,
    pub status: String,
    pub flag_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schema::comments)]
pub struct NewComment<'a> {
    pub document_id: i32,
    pub parent_comment_id: Option<i32>,
    pub comment_text: &'a str,
    pub session_hash: &'a str,
    pub status: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::annotations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AnnotationRecord {
    pub id: i32,
    pub document_id: i32,
    pub page_number: i32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub highlighted_text: Option<String>,
    pub annotation_note: Option<String>,
    pub session_hash: String,
    pub created_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schema::annotations)]
pub struct NewAnnotation<'a> {
    pub document_id: i32,
    pub page_number: i32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub highlighted_text: Option<&'a str>,
    pub annotation_note: Option<&'a str>,
    pub session_hash: &'a str,
    pub created_at: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::banned_words)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BannedWordRecord {
    pub id: i32,
    pub word: String,
    pub reason: Option<String>,
    pub banned_by: String,
    pub banned_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schema::banned_words)]
pub struct NewBannedWord<'a> {
    pub word: &'a str,
    pub reason: Option<&'a str>,
    pub banned_by: &'a str,
    pub banned_at: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::document_chunks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChunkRecord {
    pub id: i32,
    pub document_id: i32,
    pub chunk_index: i32,
    pub content: String,
    pub document_title: String,
    pub document_country: String,
    pub embedding: Vec<u8>,
    pub created_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schema::document_chunks)]
pub struct NewChunk<'a> {
    pub document_id: i32,
    pub chunk_index: i32,
    pub content: &'a str,
    pub document_title: &'a str,
    pub document_country: &'a str,
    pub embedding: &'a [u8],
    pub created_at: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::rag_queries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RagQueryRecord {
    pub id: i32,
    pub query_text: String,
    pub answer_text: Option<String>,
    pub confidence_score: Option<f32>,
    pub sources_count: Option<i32>,
    pub response_time_ms: Option<i32>,
    pub document_scope: Option<i32>,
    pub created_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schema::rag_queries)]
pub struct NewRagQuery<'a> {
    pub query_text: &'a str,
    pub answer_text: Option<&'a str>,
    pub confidence_score: Option<f32>,
    pub sources_count: Option<i32>,
    pub response_time_ms: Option<i32>,
    pub document_scope: Option<i32>,
    pub created_at: &'a str,
}
