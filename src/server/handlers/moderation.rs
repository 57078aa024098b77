use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::moderation::SortOrder;
use crate::server::AppState;

#[derive(Deserialize)]
pub struct CreateCommentBody {
    comment_text: String,
    parent_comment_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct ListCommentsQuery {
    sort_order: Option<String>,
}

#[derive(Serialize)]
pub struct CommentNodeDto {
    id: i32,
    comment_text: String,
    parent_comment_id: Option<i32>,
    descendant_count: usize,
    replies: Vec<CommentNodeDto>,
}

impl From<crate::models::CommentNode> for CommentNodeDto {
    fn from(n: crate::models::CommentNode) -> Self {
        Self {
            id: n.comment.id,
            comment_text: n.comment.comment_text,
            parent_comment_id: n.comment.parent_comment_id,
            descendant_count: n.descendant_count,
            replies: n.replies.into_iter().map(Into::into).collect(),
        }
    }
}

fn parse_sort_order(raw: Option<&str>) -> SortOrder {
    match raw {
        Some("newest") => SortOrder::Newest,
        Some("oldest") => SortOrder::Oldest,
        _ => SortOrder::MostReplies,
    }
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(document_id): Path<i32>,
    headers: HeaderMap,
    Json(body): Json<CreateCommentBody>,
) -> Result<Json<serde_json::Value>> {
    let session = super::session_hash(&headers);
    let comment = state
        .moderation
        .create_comment(document_id, body.parent_comment_id, &body.comment_text, &session)
        .await?;
    Ok(Json(serde_json::json!({ "id": comment.id, "status": comment.status.as_str() })))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(document_id): Path<i32>,
    Query(params): Query<ListCommentsQuery>,
) -> Result<Json<Vec<CommentNodeDto>>> {
    let sort_order = parse_sort_order(params.sort_order.as_deref());
    let tree = state.moderation.list_comments(document_id, sort_order).await?;
    Ok(Json(tree.into_iter().map(Into::into).collect()))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let session = super::session_hash(&headers);
    state.moderation.delete_comment(id, &session, false).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn flag_comment(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<serde_json::Value>> {
    let comment = state.moderation.flag_comment(id).await?;
    Ok(Json(serde_json::json!({ "id": comment.id, "flag_count": comment.flag_count, "status": comment.status.as_str() })))
}

#[derive(Deserialize)]
pub struct CreateAnnotationBody {
    page_number: i32,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    highlighted_text: Option<String>,
    annotation_note: Option<String>,
}

pub async fn create_annotation(
    State(state): State<AppState>,
    Path(document_id): Path<i32>,
    headers: HeaderMap,
    Json(body): Json<CreateAnnotationBody>,
) -> Result<Json<serde_json::Value>> {
    let session = super::session_hash(&headers);
    let annotation = state
        .moderation
        .create_annotation(
            document_id,
            body.page_number,
            body.x,
            body.y,
            body.width,
            body.height,
            body.highlighted_text.as_deref(),
            body.annotation_note.as_deref(),
            &session,
        )
        .await?;
    Ok(Json(serde_json::json!({ "id": annotation.id })))
}

pub async fn list_annotations(
    State(state): State<AppState>,
    Path(document_id): Path<i32>,
) -> Result<Json<Vec<crate::models::Annotation>>> {
    Ok(Json(state.moderation.list_annotations(document_id).await?))
}

pub async fn delete_annotation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let session = super::session_hash(&headers);
    state.moderation.delete_annotation(id, &session, false).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
