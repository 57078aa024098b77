//! Processing-pipeline event types, shared between the worker loop and
//! anything observing job progress.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub enum PipelineEvent {
    JobStarted { job_id: i32, document_id: i32 },
    StepStarted { job_id: i32, step: &'static str },
    StepCompleted { job_id: i32, step: &'static str },
    JobCompleted { job_id: i32, document_id: i32 },
    JobFailed { job_id: i32, document_id: i32, error: String, will_retry: bool },
}

/// The ordered steps of `process_document`, per the component design's
/// strict intra-document ordering: OCR -> tag/summary -> embedding -> done.
pub const STEPS: &[&str] = &["ocr", "tag_and_summarise", "embed", "finalise"];
