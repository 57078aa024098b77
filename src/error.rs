//! The API boundary's single error type: every subsystem error composes into
//! this via `#[from]`, and `IntoResponse` maps each variant to a stable HTTP
//! status and JSON body, per the teacher's per-module `*Error` convention
//! pulled together at the edge.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{0}")]
    InputInvalid(String),
    #[error("{0}")]
    SecurityRejected(String),
    #[error("rate limited")]
    RateLimited { retry_after_seconds: i64 },
    #[error("not found")]
    NotFound,
    #[error("queue is full")]
    QueueFull,
    #[error("{0}")]
    Conflict(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<crate::repository::RepositoryError> for ArchiveError {
    fn from(e: crate::repository::RepositoryError) -> Self {
        use crate::repository::RepositoryError as R;
        match e {
            R::NotFound(_) => ArchiveError::NotFound,
            R::Conflict(msg) => ArchiveError::Conflict(msg),
            other => ArchiveError::Internal(other.to_string()),
        }
    }
}

impl From<crate::sanitiser::SanitiseError> for ArchiveError {
    fn from(e: crate::sanitiser::SanitiseError) -> Self {
        use crate::sanitiser::SanitiseError as S;
        match e {
            S::TooLarge => ArchiveError::InputInvalid(e.to_string()),
            S::MalwareDetected(_) => ArchiveError::SecurityRejected(e.to_string()),
            S::EmptyFilename => ArchiveError::InputInvalid(e.to_string()),
        }
    }
}

impl From<crate::object_store::ObjectStoreError> for ArchiveError {
    fn from(e: crate::object_store::ObjectStoreError) -> Self {
        ArchiveError::UpstreamUnavailable(e.to_string())
    }
}

impl From<crate::work_queue::WorkQueueError> for ArchiveError {
    fn from(e: crate::work_queue::WorkQueueError) -> Self {
        use crate::work_queue::WorkQueueError as W;
        match e {
            W::QueueFull { .. } => ArchiveError::QueueFull,
            W::NotFound(_) => ArchiveError::NotFound,
            other => ArchiveError::Internal(other.to_string()),
        }
    }
}

impl From<crate::moderation::ModerationError> for ArchiveError {
    fn from(e: crate::moderation::ModerationError) -> Self {
        use crate::moderation::ModerationError as M;
        match e {
            M::RateLimited { retry_after_seconds } => ArchiveError::RateLimited { retry_after_seconds },
            M::CommentLength { .. } | M::Spam(_) | M::InvalidAnnotation(_) => {
                ArchiveError::InputInvalid(e.to_string())
            }
            M::CommentCapReached | M::InvalidParent => ArchiveError::Conflict(e.to_string()),
            M::Repository(inner) => inner.into(),
        }
    }
}

impl From<crate::search::SearchError> for ArchiveError {
    fn from(e: crate::search::SearchError) -> Self {
        ArchiveError::Internal(e.to_string())
    }
}

impl From<crate::rag::RagError> for ArchiveError {
    fn from(e: crate::rag::RagError) -> Self {
        ArchiveError::Internal(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<i64>,
}

impl IntoResponse for ArchiveError {
    fn into_response(self) -> Response {
        let (status, kind, retry_after_seconds) = match &self {
            ArchiveError::InputInvalid(_) => (StatusCode::BAD_REQUEST, "input_invalid", None),
            ArchiveError::SecurityRejected(_) => (StatusCode::BAD_REQUEST, "security_rejected", None),
            ArchiveError::RateLimited { retry_after_seconds } => {
                (StatusCode::TOO_MANY_REQUESTS, "rate_limited", Some(*retry_after_seconds))
            }
            ArchiveError::NotFound => (StatusCode::NOT_FOUND, "not_found", None),
            ArchiveError::QueueFull => (StatusCode::SERVICE_UNAVAILABLE, "queue_full", None),
            ArchiveError::Conflict(_) => (StatusCode::CONFLICT, "conflict", None),
            ArchiveError::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, "upstream_unavailable", None),
            ArchiveError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", None),
        };
        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::error!(error = %self, "internal error");
        }
        let body = ErrorBody { error: kind, message: self.to_string(), retry_after_seconds };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
