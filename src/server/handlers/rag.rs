use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::error::Result;
use crate::rag::{RagAnswer, RagScope};
use crate::server::AppState;

#[derive(Deserialize)]
pub struct RagQuestionBody {
    question: String,
}

pub async fn rag_question(
    State(state): State<AppState>,
    Json(body): Json<RagQuestionBody>,
) -> Result<Json<RagAnswer>> {
    let answer = state.rag.answer(&body.question, RagScope::Global).await?;
    Ok(Json(answer))
}

pub async fn rag_document_question(
    State(state): State<AppState>,
    Path(document_id): Path<i32>,
    Json(body): Json<RagQuestionBody>,
) -> Result<Json<RagAnswer>> {
    let answer = state.rag.answer(&body.question, RagScope::Document(document_id)).await?;
    Ok(Json(answer))
}
