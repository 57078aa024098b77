use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{AnnotationRecord, NewAnnotation};
use super::diesel_pool::AsyncSqlitePool;
use super::{parse_datetime, RepositoryError, Result};
use crate::models::Annotation;
use crate::schema::annotations;

pub struct AnnotationRepository {
    pool: AsyncSqlitePool,
}

impl AnnotationRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        document_id: i32,
        page_number: i32,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        highlighted_text: Option<&str>,
        annotation_note: Option<&str>,
        session_hash: &str,
    ) -> Result<Annotation> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        let new = NewAnnotation {
            document_id,
            page_number,
            x,
            y,
            width,
            height,
            highlighted_text,
            annotation_note,
            session_hash,
            created_at: &now,
        };
        let id: i32 = diesel::insert_into(annotations::table)
            .values(&new)
            .returning(annotations::id)
            .get_result(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        self.get(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("annotation {id}")))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Annotation>> {
        let mut conn = self.pool.get().await?;
        let record = annotations::table
            .find(id)
            .select(AnnotationRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepositoryError::Database)?;
        Ok(record.map(from_record))
    }

    pub async fn list_for_document(&self, document_id: i32) -> Result<Vec<Annotation>> {
        let mut conn = self.pool.get().await?;
        let records = annotations::table
            .filter(annotations::document_id.eq(document_id))
            .order(annotations::page_number.asc())
            .select(AnnotationRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(records.into_iter().map(from_record).collect())
    }

    pub async fn last_write_at(
        &self,
        document_id: i32,
        session_hash: &str,
    ) -> Result<Option<chrono::DateTime<Utc>>> {
        let mut conn = self.pool.get().await?;
        let latest: Option<String> = annotations::table
            .filter(annotations::document_id.eq(document_id))
            .filter(annotations::session_hash.eq(session_hash))
            .order(annotations::created_at.desc())
            .select(annotations::created_at)
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepositoryError::Database)?;
        Ok(latest.map(|s| parse_datetime(&s)))
    }

    pub async fn delete(&self, id: i32, session_hash: &str, is_admin: bool) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let annotation = self
            .get(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("annotation {id}")))?;
        if !is_admin && annotation.session_hash != session_hash {
            return Err(RepositoryError::Conflict(
                "only the originating session may delete this annotation".into(),
            ));
        }
        diesel::delete(annotations::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(())
    }
}

fn from_record(r: AnnotationRecord) -> Annotation {
    Annotation {
        id: r.id,
        document_id: r.document_id,
        page_number: r.page_number,
        x: r.x,
        y: r.y,
        width: r.width,
        height: r.height,
        highlighted_text: r.highlighted_text,
        annotation_note: r.annotation_note,
        session_hash: r.session_hash,
        created_at: parse_datetime(&r.created_at),
    }
}
