use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};
use crate::models::Document;
use crate::moderation::{bucket_identifier, DOWNLOAD_BUCKET_SECONDS};
use crate::repository::{DocumentFilter, SearchMode};
use crate::server::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
    page: Option<i64>,
    per_page: Option<i64>,
    country: Option<String>,
    state: Option<String>,
    search_type: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResultDto {
    document: DocumentDto,
    score: f32,
    matched_chunk: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    results: Vec<SearchResultDto>,
    page: i64,
    per_page: i64,
}

#[derive(Serialize)]
pub struct DocumentDto {
    pub id: i32,
    pub title: String,
    pub country: String,
    pub state: String,
    pub description: Option<String>,
    pub document_language: String,
    pub ocr_text: Option<String>,
    pub generated_tags: Vec<String>,
    pub ai_summary: Option<String>,
    pub status: &'static str,
    pub file_url: String,
    pub view_count: i32,
    pub has_english_translation: bool,
    pub has_arabic_text: bool,
}

/// Converts an already post-processed document (redacted, English-promoted)
/// into its wire shape. Callers must run [`crate::search::apply_post_processing`]
/// on `d` first; this does not redact anything itself.
impl From<Document> for DocumentDto {
    fn from(d: Document) -> Self {
        Self {
            id: d.id,
            title: d.title,
            country: d.country,
            state: d.state,
            description: d.description,
            document_language: d.document_language,
            has_english_translation: d.has_english_translation(),
            has_arabic_text: d.has_arabic_text(),
            ocr_text: d.ocr_text,
            generated_tags: d.generated_tags,
            ai_summary: d.ai_summary,
            status: d.status.as_str(),
            file_url: d.file_url,
            view_count: d.view_count,
        }
    }
}

fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

fn clamp_per_page(per_page: Option<i64>) -> i64 {
    per_page.unwrap_or(20).clamp(1, 100)
}

pub async fn search(State(state): State<AppState>, Query(params): Query<SearchQuery>) -> Result<Json<SearchResponse>> {
    let page = clamp_page(params.page);
    let per_page = clamp_per_page(params.per_page);
    let query = params.q.clone().unwrap_or_default();

    // Empty q ignores mode entirely: most recent approved documents, newest first.
    let mut results = if query.is_empty() {
        let filter = DocumentFilter { country: params.country.clone(), state: params.state.clone(), status: None };
        state
            .documents
            .list_recent(&filter, page, per_page)
            .await
            .map_err(ArchiveError::from)?
            .into_iter()
            .map(|document| crate::search::SearchResult { document, score: 0.0, matched_chunk: None })
            .collect()
    } else {
        let mode = match params.search_type.as_deref() {
            Some("semantic") => SearchMode::Semantic,
            Some("keyword") => SearchMode::Keyword,
            _ => SearchMode::Hybrid,
        };
        state.search.search(&query, mode, per_page).await?
    };

    if query.is_empty() {
        let banned = state
            .banned_words
            .list()
            .await
            .map_err(ArchiveError::from)?
            .into_iter()
            .map(|b| b.word)
            .collect::<Vec<_>>();
        for result in &mut results {
            crate::search::apply_post_processing(&mut result.document, &banned);
        }
    }

    let results = results
        .into_iter()
        .map(|r| SearchResultDto { document: r.document.into(), score: r.score, matched_chunk: r.matched_chunk })
        .collect();

    Ok(Json(SearchResponse { results, page, per_page }))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<DocumentDto>> {
    let mut document = state.documents.get_approved(id).await.map_err(ArchiveError::from)?.ok_or(ArchiveError::NotFound)?;

    let session = super::session_hash(&headers);
    if state.moderation.view_tracker.record_if_fresh(id, &session).await {
        state.documents.increment_view_count(id).await.ok();
    }

    let banned = state
        .banned_words
        .list()
        .await
        .map_err(ArchiveError::from)?
        .into_iter()
        .map(|b| b.word)
        .collect::<Vec<_>>();
    crate::search::apply_post_processing(&mut document, &banned);

    Ok(Json(document.into()))
}

#[derive(Deserialize)]
pub struct DownloadQuery {
    language: Option<String>,
}

pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<DownloadQuery>,
) -> Result<Response> {
    let document = state.documents.get_approved(id).await.map_err(ArchiveError::from)?.ok_or(ArchiveError::NotFound)?;

    let language = params.language.as_deref().unwrap_or("original");
    if language == "original" {
        let identifier = bucket_identifier("download", DOWNLOAD_BUCKET_SECONDS);
        state
            .download_limiter
            .check_and_record(&identifier, DOWNLOAD_BUCKET_SECONDS)
            .await
            .map_err(|e| ArchiveError::RateLimited { retry_after_seconds: e.retry_after_seconds as i64 })?;

        let bytes = state.object_store.get(&document.file_path).await?;
        return Ok((
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", document.original_filename)),
            ],
            bytes,
        )
            .into_response());
    }

    let text = if language == "english" {
        document.ocr_text_english.or(document.ocr_text).unwrap_or_default()
    } else {
        document.ocr_text_original.unwrap_or_default()
    };
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"document_{id}.txt\"")),
        ],
        text,
    )
        .into_response())
}
