use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "processing" => Some(JobStatus::Processing),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Processing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    ProcessDocument,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::ProcessDocument => "process_document",
        }
    }
}

pub const DEFAULT_MAX_RETRIES: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i32,
    pub document_id: i32,
    pub job_type: JobType,
    pub status: JobStatus,
    pub priority: i32,
    pub current_step: Option<String>,
    pub progress_percent: i32,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub max_retries: i32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn clamp_percent(percent: i32) -> i32 {
        percent.clamp(0, 100)
    }

    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped_to_valid_range() {
        assert_eq!(Job::clamp_percent(-5), 0);
        assert_eq!(Job::clamp_percent(150), 100);
        assert_eq!(Job::clamp_percent(42), 42);
    }

    #[test]
    fn active_statuses_exclude_terminal_states() {
        assert!(JobStatus::Pending.is_active());
        assert!(JobStatus::Processing.is_active());
        assert!(!JobStatus::Completed.is_active());
        assert!(!JobStatus::Failed.is_active());
    }
}
