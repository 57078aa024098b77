use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RagQueryRecord {
    pub id: i32,
    pub query_text: String,
    pub answer_text: Option<String>,
    pub confidence_score: Option<f32>,
    pub sources_count: Option<i32>,
    pub response_time_ms: Option<i32>,
    pub document_scope: Option<i32>,
    pub created_at: DateTime<Utc>,
}
