use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::NewRagQuery;
use super::diesel_pool::AsyncSqlitePool;
use super::{RepositoryError, Result};
use crate::schema::rag_queries;

pub struct RagQueryRepository {
    pool: AsyncSqlitePool,
}

impl RagQueryRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn log(
        &self,
        query_text: &str,
        answer_text: Option<&str>,
        confidence_score: Option<f32>,
        sources_count: Option<i32>,
        response_time_ms: Option<i32>,
        document_scope: Option<i32>,
    ) -> Result<i32> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        let new = NewRagQuery {
            query_text,
            answer_text,
            confidence_score,
            sources_count,
            response_time_ms,
            document_scope,
            created_at: &now,
        };
        let id: i32 = diesel::insert_into(rag_queries::table)
            .values(&new)
            .returning(rag_queries::id)
            .get_result(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(id)
    }
}
