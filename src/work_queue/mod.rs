//! Durable job queue: one active job per document, FIFO within priority,
//! bounded retries, atomic claim. Modelled as a trait so a future
//! message-broker-backed queue can be dropped in for [`DbJobQueue`].

mod db_queue;
pub mod error;
mod handle;
pub mod pipeline;
pub mod runner;

pub use db_queue::DbJobQueue;
pub use error::{Result, WorkQueueError};
pub use handle::WorkHandle;

use async_trait::async_trait;
use crate::models::Job;

pub const MAX_ACTIVE_JOBS: i64 = 100;

/// Snapshot of queue depth by status, surfaced on the admin queue-stats endpoint.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct QueueStats {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub failed: i64,
}

#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Enqueue processing for a document, returning the existing active job
    /// if one is already pending or processing (idempotent enqueue).
    async fn enqueue(&self, document_id: i32, priority: i32) -> Result<Job>;

    /// Atomically claim the highest-priority, oldest pending job.
    async fn next(&self) -> Result<Option<WorkHandle<Job>>>;

    async fn update_progress(&self, job_id: i32, step: &str, percent: i32) -> Result<()>;

    async fn complete(&self, handle: WorkHandle<Job>) -> Result<()>;

    /// Fail a job. When `retry` is true and retries remain, the job resets to
    /// pending; otherwise it becomes terminally `failed`.
    async fn fail(&self, handle: WorkHandle<Job>, message: &str, retry: bool) -> Result<()>;

    /// 1-based position among pending jobs ahead of this one.
    async fn position(&self, job_id: i32) -> Result<i64>;

    async fn stats(&self) -> Result<QueueStats>;
}
