//! Comment/annotation moderation service: rate limiting, spam filtering,
//! threading, and view-count suppression layered over the repository layer.

mod comment_tree;
mod rate_limit;
mod spam_filter;
mod view_tracking;

pub use comment_tree::{comment_tree, SortOrder};
pub use rate_limit::{
    bucket_identifier, write_cooldown_remaining, InMemoryRateLimiter, RateLimitExceeded,
    DOWNLOAD_BUCKET_SECONDS, UPLOAD_BUCKET_SECONDS, WRITE_SPACING_SECONDS,
};
pub use spam_filter::SpamFilter;
pub use view_tracking::ViewTracker;

use std::sync::Arc;

use thiserror::Error;

use crate::models::comment::{MAX_ACTIVE_COMMENTS_PER_DOCUMENT, MAX_COMMENT_LENGTH, MIN_COMMENT_LENGTH};
use crate::models::{Annotation, AnnotationValidationError, Comment, CommentNode, CommentStatus};
use crate::repository::{AnnotationRepository, CommentRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("comment must be between {min} and {max} characters")]
    CommentLength { min: usize, max: usize },
    #[error("document has reached its active comment limit")]
    CommentCapReached,
    #[error("rate limited; retry in {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: i64 },
    #[error("comment rejected: contains banned terms {0:?}")]
    Spam(Vec<String>),
    #[error("parent comment must be approved and on the same document")]
    InvalidParent,
    #[error("invalid annotation: {0}")]
    InvalidAnnotation(#[from] AnnotationValidationError),
}

pub type Result<T> = std::result::Result<T, ModerationError>;

pub struct ModerationService {
    comments: Arc<CommentRepository>,
    annotations: Arc<AnnotationRepository>,
    spam_filter: Arc<SpamFilter>,
    pub view_tracker: Arc<ViewTracker>,
}

impl ModerationService {
    pub fn new(
        comments: Arc<CommentRepository>,
        annotations: Arc<AnnotationRepository>,
        spam_filter: Arc<SpamFilter>,
        view_tracker: Arc<ViewTracker>,
    ) -> Self {
        Self { comments, annotations, spam_filter, view_tracker }
    }

    pub async fn create_comment(
        &self,
        document_id: i32,
        parent_comment_id: Option<i32>,
        text: &str,
        session_hash: &str,
    ) -> Result<Comment> {
        if text.len() < MIN_COMMENT_LENGTH || text.len() > MAX_COMMENT_LENGTH {
            return Err(ModerationError::CommentLength { min: MIN_COMMENT_LENGTH, max: MAX_COMMENT_LENGTH });
        }
        if self.comments.active_count(document_id).await? >= MAX_ACTIVE_COMMENTS_PER_DOCUMENT {
            return Err(ModerationError::CommentCapReached);
        }
        if let Some(remaining) = write_cooldown_remaining(self.comments.last_write_at(document_id, session_hash).await?) {
            return Err(ModerationError::RateLimited { retry_after_seconds: remaining });
        }
        let (is_spam, matched) = self.spam_filter.check(text).await?;
        if is_spam {
            return Err(ModerationError::Spam(matched));
        }
        if let Some(parent_id) = parent_comment_id {
            let parent = self.comments.get(parent_id).await?;
            let valid = parent
                .as_ref()
                .is_some_and(|p| p.document_id == document_id && p.status == CommentStatus::Approved);
            if !valid {
                return Err(ModerationError::InvalidParent);
            }
        }
        Ok(self.comments.create(document_id, parent_comment_id, text, session_hash).await?)
    }

    pub async fn flag_comment(&self, id: i32) -> Result<Comment> {
        Ok(self.comments.flag(id).await?)
    }

    pub async fn delete_comment(&self, id: i32, session_hash: &str, is_admin: bool) -> Result<()> {
        Ok(self.comments.delete(id, session_hash, is_admin).await?)
    }

    pub async fn list_comments(&self, document_id: i32, sort_order: SortOrder) -> Result<Vec<CommentNode>> {
        let flat = self.comments.list_for_document(document_id).await?;
        Ok(comment_tree(flat, sort_order))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_annotation(
        &self,
        document_id: i32,
        page_number: i32,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        highlighted_text: Option<&str>,
        note: Option<&str>,
        session_hash: &str,
    ) -> Result<Annotation> {
        Annotation::validate(page_number, x, y, width, height)?;
        if let Some(note) = note {
            let (is_spam, matched) = self.spam_filter.check(note).await?;
            if is_spam {
                return Err(ModerationError::Spam(matched));
            }
        }
        if let Some(remaining) =
            write_cooldown_remaining(self.annotations.last_write_at(document_id, session_hash).await?)
        {
            return Err(ModerationError::RateLimited { retry_after_seconds: remaining });
        }
        Ok(self
            .annotations
            .create(document_id, page_number, x, y, width, height, highlighted_text, note, session_hash)
            .await?)
    }

    pub async fn delete_annotation(&self, id: i32, session_hash: &str, is_admin: bool) -> Result<()> {
        Ok(self.annotations.delete(id, session_hash, is_admin).await?)
    }

    pub async fn list_annotations(&self, document_id: i32) -> Result<Vec<Annotation>> {
        Ok(self.annotations.list_for_document(document_id).await?)
    }

    /// Forces the next spam check to re-query the banned word list, used after
    /// an admin bans or unbans a word so the change takes effect immediately.
    pub async fn invalidate_spam_cache(&self) {
        self.spam_filter.invalidate().await;
    }
}
