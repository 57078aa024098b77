//! Domain models for the archive.

pub mod annotation;
pub mod banned_word;
pub mod comment;
pub mod document;
pub mod job;
pub mod rag_query;

pub use annotation::{Annotation, AnnotationValidationError};
pub use banned_word::BannedWord;
pub use comment::{Comment, CommentNode, CommentStatus};
pub use document::{Document, DocumentStatus};
pub use job::{Job, JobStatus, JobType};
pub use rag_query::RagQueryRecord;
