use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::error::{ArchiveError, Result};
use crate::models::BannedWord;
use crate::work_queue::QueueStats;
use crate::server::AppState;

const DEFAULT_PRIORITY: i32 = 0;

fn admin_identity(headers: &HeaderMap) -> String {
    headers
        .get("x-admin-email")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown-admin")
        .to_string()
}

pub async fn approve_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let admin = admin_identity(&headers);
    state.documents.approve(id, &admin).await.map_err(ArchiveError::from)?;
    let job = state.queue.enqueue(id, DEFAULT_PRIORITY).await?;
    Ok(Json(serde_json::json!({ "document_id": id, "job_id": job.id, "approved_by": admin })))
}

#[derive(Deserialize)]
pub struct RejectBody {
    reason: String,
}

pub async fn reject_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(body): Json<RejectBody>,
) -> Result<Json<serde_json::Value>> {
    let admin = admin_identity(&headers);
    state.documents.reject(id, &admin, &body.reason).await.map_err(ArchiveError::from)?;
    Ok(Json(serde_json::json!({ "document_id": id, "rejected_by": admin })))
}

pub async fn queue_stats(State(state): State<AppState>) -> Result<Json<QueueStats>> {
    Ok(Json(state.queue.stats().await?))
}

#[derive(Deserialize)]
pub struct BanWordBody {
    word: String,
    reason: Option<String>,
}

pub async fn ban_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<BanWordBody>,
) -> Result<Json<BannedWord>> {
    let admin = admin_identity(&headers);
    let word = state.banned_words.ban(&body.word, body.reason.as_deref(), &admin).await.map_err(ArchiveError::from)?;
    state.moderation.invalidate_spam_cache().await;
    Ok(Json(word))
}

#[derive(Deserialize)]
pub struct UnbanWordBody {
    word: String,
}

pub async fn unban_word(
    State(state): State<AppState>,
    Json(body): Json<UnbanWordBody>,
) -> Result<Json<serde_json::Value>> {
    state.banned_words.unban(&body.word).await.map_err(ArchiveError::from)?;
    state.moderation.invalidate_spam_cache().await;
    Ok(Json(serde_json::json!({ "unbanned": body.word })))
}
