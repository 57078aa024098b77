//! Repository layer for database persistence.

#![allow(dead_code)]

mod annotations;
mod banned_words;
mod comments;
pub mod diesel_models;
pub mod diesel_pool;
mod documents;
mod migrations;
mod rag_queries;

pub use annotations::AnnotationRepository;
pub use banned_words::BannedWordRepository;
pub use comments::CommentRepository;
pub use documents::{DocumentFilter, DocumentRepository, NewDocumentInput, SearchMode};
pub use migrations::run_migrations;
pub use rag_queries::RagQueryRepository;

use chrono::{DateTime, Utc};
use std::path::Path;
use std::thread;
use std::time::Duration;
use thiserror::Error;

pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

pub fn parse_datetime_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Open a raw rusqlite connection with the pragmas the rest of the crate assumes
/// (WAL mode, busy timeout, and a cache/mmap profile tuned for a single-writer,
/// many-reader archive).
pub fn connect(db_path: &Path) -> rusqlite::Result<rusqlite::Connection> {
    let conn = rusqlite::Connection::open(db_path)?;
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 30000;

        PRAGMA cache_size = -64000;
        PRAGMA mmap_size = 268435456;
        PRAGMA temp_store = MEMORY;
        PRAGMA page_size = 4096;
    "#,
    )?;
    Ok(conn)
}

/// Execute a database operation with retry logic for lock errors.
/// Retries up to 5 times with exponential backoff (100ms, 200ms, 400ms, 800ms, 1600ms).
pub fn with_retry<T, F>(mut operation: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let max_retries = 5;
    let mut delay_ms = 100;

    for attempt in 0..max_retries {
        match operation() {
            Ok(result) => return Ok(result),
            Err(RepositoryError::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::Unknown,
                ref info,
            ))) if info.message().contains("locked") || info.message().contains("busy") => {
                if attempt < max_retries - 1 {
                    tracing::debug!(
                        "Database locked, retrying in {}ms (attempt {}/{})",
                        delay_ms,
                        attempt + 1,
                        max_retries
                    );
                    thread::sleep(Duration::from_millis(delay_ms));
                    delay_ms *= 2;
                    continue;
                }
                return operation();
            }
            Err(e) => return Err(e),
        }
    }

    operation()
}
