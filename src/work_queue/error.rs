use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkQueueError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("job already claimed")]
    AlreadyClaimed,
    #[error("queue is full ({active}/{cap} active jobs)")]
    QueueFull { active: i64, cap: i64 },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("other: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, WorkQueueError>;
