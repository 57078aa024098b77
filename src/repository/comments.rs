use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{CommentRecord, NewComment};
use super::diesel_pool::AsyncSqlitePool;
use super::{parse_datetime, RepositoryError, Result};
use crate::models::{Comment, CommentStatus};
use crate::schema::comments;

pub struct CommentRepository {
    pool: AsyncSqlitePool,
}

impl CommentRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    pub async fn active_count(&self, document_id: i32) -> Result<i64> {
        let mut conn = self.pool.get().await?;
        let count = comments::table
            .filter(comments::document_id.eq(document_id))
            .filter(comments::status.eq_any([
                CommentStatus::Pending.as_str(),
                CommentStatus::Approved.as_str(),
            ]))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(count)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Comment>> {
        let mut conn = self.pool.get().await?;
        let record = comments::table
            .find(id)
            .select(CommentRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepositoryError::Database)?;
        Ok(record.map(from_record))
    }

    pub async fn last_write_at(&self, document_id: i32, session_hash: &str) -> Result<Option<chrono::DateTime<Utc>>> {
        let mut conn = self.pool.get().await?;
        let latest: Option<String> = comments::table
            .filter(comments::document_id.eq(document_id))
            .filter(comments::session_hash.eq(session_hash))
            .order(comments::created_at.desc())
            .select(comments::created_at)
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepositoryError::Database)?;
        Ok(latest.map(|s| parse_datetime(&s)))
    }

    pub async fn create(
        &self,
        document_id: i32,
        parent_comment_id: Option<i32>,
        text: &str,
        session_hash: &str,
    ) -> Result<Comment> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        let new = NewComment {
            document_id,
            parent_comment_id,
            comment_text: text,
            session_hash,
            status: CommentStatus::Approved.as_str(),
            created_at: &now,
            updated_at: &now,
        };
        let id: i32 = diesel::insert_into(comments::table)
            .values(&new)
            .returning(comments::id)
            .get_result(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        self.get(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("comment {id}")))
    }

    pub async fn list_for_document(&self, document_id: i32) -> Result<Vec<Comment>> {
        let mut conn = self.pool.get().await?;
        let records = comments::table
            .filter(comments::document_id.eq(document_id))
            .filter(comments::status.eq(CommentStatus::Approved.as_str()))
            .order(comments::created_at.asc())
            .select(CommentRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(records.into_iter().map(from_record).collect())
    }

    pub async fn flag(&self, id: i32) -> Result<Comment> {
        let mut conn = self.pool.get().await?;
        diesel::update(comments::table.find(id))
            .set(comments::flag_count.eq(comments::flag_count + 1))
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        let comment = self
            .get(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("comment {id}")))?;
        if comment.flag_count >= crate::models::comment::FLAG_THRESHOLD {
            diesel::update(comments::table.find(id))
                .set(comments::status.eq(CommentStatus::Flagged.as_str()))
                .execute(&mut conn)
                .await
                .map_err(RepositoryError::Database)?;
            return self
                .get(id)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(format!("comment {id}")));
        }
        Ok(comment)
    }

    pub async fn delete(&self, id: i32, session_hash: &str, is_admin: bool) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let comment = self
            .get(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("comment {id}")))?;
        if !is_admin && comment.session_hash != session_hash {
            return Err(RepositoryError::Conflict(
                "only the originating session may delete this comment".into(),
            ));
        }
        diesel::delete(comments::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(())
    }
}

fn from_record(r: CommentRecord) -> Comment {
    Comment {
        id: r.id,
        document_id: r.document_id,
        parent_comment_id: r.parent_comment_id,
        comment_text: r.comment_text,
        session_hash: r.session_hash,
        status: CommentStatus::from_str(&r.status).unwrap_or(CommentStatus::Approved),
        flag_count: r.flag_count,
        created_at: parse_datetime(&r.created_at),
        updated_at: parse_datetime(&r.updated_at),
    }
}
