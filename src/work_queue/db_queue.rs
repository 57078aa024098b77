use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::error::{Result, WorkQueueError};
use super::handle::WorkHandle;
use super::{QueueStats, WorkQueue, MAX_ACTIVE_JOBS};
use crate::models::job::DEFAULT_MAX_RETRIES;
use crate::models::{Job, JobStatus, JobType};
use crate::repository::diesel_models::{JobRecord, NewJob};
use crate::repository::diesel_pool::AsyncSqlitePool;
use crate::repository::parse_datetime;
use crate::schema::jobs;

pub struct DbJobQueue {
    pool: AsyncSqlitePool,
}

impl DbJobQueue {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    async fn active_count(&self) -> Result<i64> {
        let mut conn = self.pool.get().await?;
        let count = jobs::table
            .filter(jobs::status.eq_any([JobStatus::Pending.as_str(), JobStatus::Processing.as_str()]))
            .count()
            .get_result(&mut conn)
            .await?;
        Ok(count)
    }

    async fn find_active_for_document(&self, document_id: i32) -> Result<Option<Job>> {
        let mut conn = self.pool.get().await?;
        let record = jobs::table
            .filter(jobs::document_id.eq(document_id))
            .filter(jobs::status.eq_any([JobStatus::Pending.as_str(), JobStatus::Processing.as_str()]))
            .select(JobRecord::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(record.map(from_record))
    }

    async fn get(&self, job_id: i32) -> Result<Job> {
        let mut conn = self.pool.get().await?;
        let record = jobs::table
            .find(job_id)
            .select(JobRecord::as_select())
            .first(&mut conn)
            .await
            .optional()?
            .ok_or_else(|| WorkQueueError::NotFound(job_id.to_string()))?;
        Ok(from_record(record))
    }
}

#[async_trait]
impl WorkQueue for DbJobQueue {
    async fn enqueue(&self, document_id: i32, priority: i32) -> Result<Job> {
        if let Some(existing) = self.find_active_for_document(document_id).await? {
            return Ok(existing);
        }
        let active = self.active_count().await?;
        if active >= MAX_ACTIVE_JOBS {
            return Err(WorkQueueError::QueueFull {
                active,
                cap: MAX_ACTIVE_JOBS,
            });
        }
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        let new = NewJob {
            document_id,
            job_type: JobType::ProcessDocument.as_str(),
            status: JobStatus::Pending.as_str(),
            priority,
            created_at: &now,
        };
        let id: i32 = diesel::insert_into(jobs::table)
            .values(&new)
            .returning(jobs::id)
            .get_result(&mut conn)
            .await?;
        self.get(id).await
    }

    async fn next(&self) -> Result<Option<WorkHandle<Job>>> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        // SQLite has no SELECT...FOR UPDATE SKIP LOCKED; a single-writer WAL
        // database makes the select-then-update here effectively atomic since
        // diesel-async serialises writes through one connection at a time.
        let candidate = jobs::table
            .filter(jobs::status.eq(JobStatus::Pending.as_str()))
            .order((jobs::priority.desc(), jobs::created_at.asc()))
            .select(JobRecord::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        let Some(record) = candidate else {
            return Ok(None);
        };
        let updated = diesel::update(
            jobs::table
                .filter(jobs::id.eq(record.id))
                .filter(jobs::status.eq(JobStatus::Pending.as_str())),
        )
        .set((jobs::status.eq(JobStatus::Processing.as_str()), jobs::started_at.eq(&now)))
        .execute(&mut conn)
        .await?;
        if updated == 0 {
            // Another worker claimed it between the select and the update.
            return Ok(None);
        }
        let job = self.get(record.id).await?;
        Ok(Some(WorkHandle::new(job.clone(), job.id)))
    }

    async fn update_progress(&self, job_id: i32, step: &str, percent: i32) -> Result<()> {
        let mut conn = self.pool.get().await?;
        diesel::update(jobs::table.find(job_id))
            .set((
                jobs::current_step.eq(step),
                jobs::progress_percent.eq(Job::clamp_percent(percent)),
            ))
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn complete(&self, handle: WorkHandle<Job>) -> Result<()> {
        let job = handle.consume();
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        diesel::update(jobs::table.find(job.id))
            .set((
                jobs::status.eq(JobStatus::Completed.as_str()),
                jobs::progress_percent.eq(100),
                jobs::completed_at.eq(&now),
            ))
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn fail(&self, handle: WorkHandle<Job>, message: &str, retry: bool) -> Result<()> {
        let job = handle.consume();
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();
        let retry_count = job.retry_count + 1;
        if retry && retry_count < job.max_retries.max(DEFAULT_MAX_RETRIES) {
            diesel::update(jobs::table.find(job.id))
                .set((
                    jobs::status.eq(JobStatus::Pending.as_str()),
                    jobs::retry_count.eq(retry_count),
                    jobs::current_step.eq::<Option<String>>(None),
                    jobs::progress_percent.eq(0),
                    jobs::error_message.eq(message),
                ))
                .execute(&mut conn)
                .await?;
        } else {
            diesel::update(jobs::table.find(job.id))
                .set((
                    jobs::status.eq(JobStatus::Failed.as_str()),
                    jobs::retry_count.eq(retry_count),
                    jobs::error_message.eq(message),
                    jobs::failed_at.eq(&now),
                ))
                .execute(&mut conn)
                .await?;
        }
        Ok(())
    }

    async fn position(&self, job_id: i32) -> Result<i64> {
        let job = self.get(job_id).await?;
        let mut conn = self.pool.get().await?;
        let ahead: i64 = jobs::table
            .filter(jobs::status.eq(JobStatus::Pending.as_str()))
            .filter(
                jobs::priority
                    .gt(job.priority)
                    .or(jobs::priority
                        .eq(job.priority)
                        .and(jobs::created_at.lt(job.created_at.to_rfc3339()))),
            )
            .count()
            .get_result(&mut conn)
            .await?;
        Ok(ahead + 1)
    }

    async fn stats(&self) -> Result<QueueStats> {
        let mut conn = self.pool.get().await?;
        let count_for = |status: JobStatus| status.as_str().to_string();
        let pending = jobs::table
            .filter(jobs::status.eq(count_for(JobStatus::Pending)))
            .count()
            .get_result(&mut conn)
            .await?;
        let processing = jobs::table
            .filter(jobs::status.eq(count_for(JobStatus::Processing)))
            .count()
            .get_result(&mut conn)
            .await?;
        let completed = jobs::table
            .filter(jobs::status.eq(count_for(JobStatus::Completed)))
            .count()
            .get_result(&mut conn)
            .await?;
        let failed = jobs::table
            .filter(jobs::status.eq(count_for(JobStatus::Failed)))
            .count()
            .get_result(&mut conn)
            .await?;
        Ok(QueueStats { pending, processing, completed, failed })
    }
}

fn from_record(r: JobRecord) -> Job {
    Job {
        id: r.id,
        document_id: r.document_id,
        job_type: JobType::ProcessDocument,
        status: JobStatus::from_str(&r.status).unwrap_or(JobStatus::Pending),
        priority: r.priority,
        current_step: r.current_step,
        progress_percent: r.progress_percent,
        error_message: r.error_message,
        retry_count: r.retry_count,
        max_retries: r.max_retries,
        created_at: parse_datetime(&r.created_at),
        started_at: r.started_at.as_deref().map(parse_datetime),
        completed_at: r.completed_at.as_deref().map(parse_datetime),
        failed_at: r.failed_at.as_deref().map(parse_datetime),
    }
}
