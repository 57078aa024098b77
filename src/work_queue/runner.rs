//! Worker loop: claims jobs and drives a document through OCR -> translate ->
//! tag/summarise -> embed -> finalise, in that strict order. External calls
//! (OCR, translation, summarisation, embedding) are isolated behind
//! `spawn_blocking`/async HTTP clients so they never block the API runtime.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Duration;

use super::pipeline::PipelineEvent;
use super::{WorkQueue, WorkQueueError};
use crate::embedding::Embedder;
use crate::ocr::OcrBackend;
use crate::repository::DocumentRepository;
use crate::search::MAX_SEARCH_TEXT_WORDS;
use crate::summariser::Summariser;
use crate::tagger;
use crate::translate::Translator;
use crate::vector_store::{chunk_text, VectorStore};

pub struct PipelineRunner {
    pub queue: Arc<dyn WorkQueue>,
    pub documents: Arc<DocumentRepository>,
    pub ocr: Arc<dyn OcrBackend>,
    pub translator: Arc<dyn Translator>,
    pub summariser: Arc<Summariser>,
    pub embedder: Arc<dyn Embedder>,
    pub vector_store: Arc<dyn VectorStore>,
    pub banned_words: Vec<String>,
}

impl PipelineRunner {
    pub async fn run_forever(&self, events: Option<UnboundedSender<PipelineEvent>>, poll_interval: Duration) {
        loop {
            match self.run_once(&events).await {
                Ok(true) => continue,
                Ok(false) => tokio::time::sleep(poll_interval).await,
                Err(e) => {
                    tracing::error!(error = %e, "pipeline runner iteration failed");
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }
    }

    /// Claims and processes a single job. Returns `Ok(true)` if a job was
    /// found (whether it succeeded or failed), `Ok(false)` if the queue was
    /// empty.
    pub async fn run_once(&self, events: &Option<UnboundedSender<PipelineEvent>>) -> super::Result<bool> {
        let Some(handle) = self.queue.next().await? else {
            return Ok(false);
        };
        let job = handle.item().clone();
        emit(events, PipelineEvent::JobStarted { job_id: job.id, document_id: job.document_id });

        match self.process_document(job.document_id, job.id, events).await {
            Ok(()) => {
                self.queue.complete(handle).await?;
                emit(events, PipelineEvent::JobCompleted { job_id: job.id, document_id: job.document_id });
            }
            Err(e) => {
                tracing::warn!(job_id = job.id, document_id = job.document_id, error = %e, "document processing failed");
                let retry = !matches!(e, ProcessingError::Fatal(_));
                self.queue.fail(handle, &e.to_string(), retry).await?;
                emit(
                    events,
                    PipelineEvent::JobFailed {
                        job_id: job.id,
                        document_id: job.document_id,
                        error: e.to_string(),
                        will_retry: retry,
                    },
                );
            }
        }
        Ok(true)
    }

    async fn process_document(
        &self,
        document_id: i32,
        job_id: i32,
        events: &Option<UnboundedSender<PipelineEvent>>,
    ) -> std::result::Result<(), ProcessingError> {
        let document = self
            .documents
            .get(document_id)
            .await
            .map_err(|e| ProcessingError::Fatal(e.to_string()))?
            .ok_or_else(|| ProcessingError::Fatal(format!("document {document_id} vanished")))?;

        if !matches!(
            document.status,
            crate::models::DocumentStatus::Approved | crate::models::DocumentStatus::Processed
        ) {
            // Document was rejected/deleted while queued; nothing to do.
            return Ok(());
        }

        step(events, job_id, "ocr");
        let bytes = {
            // The object store lookup is assumed already performed by the
            // caller that enqueued this job in a real deployment; here the
            // worker re-reads `file_path` directly for OCR input.
            tokio::fs::read(&document.file_path)
                .await
                .map_err(|e| ProcessingError::Retryable(format!("reading blob: {e}")))?
        };
        let original_text = self
            .ocr
            .ocr_document(&bytes, &document.content_type, &document.document_language)
            .await
            .unwrap_or_default();
        self.queue.update_progress(job_id, "ocr", 25).await.ok();

        let english_text = if crate::models::Document::is_english(&document.document_language) {
            original_text.clone()
        } else {
            self.translator
                .translate_to_english(&original_text, &document.document_language)
                .await
                .unwrap_or_else(|_| original_text.clone())
        };

        step(events, job_id, "tag_and_summarise");
        let preferred_text = if english_text.is_empty() { original_text.clone() } else { english_text.clone() };
        let tags = tagger::extract_tags(&preferred_text, &self.banned_words, tagger::DEFAULT_MAX_TAGS);
        let summary = self
            .summariser
            .summarise(&document.title, &preferred_text)
            .await
            .ok()
            .flatten();
        self.queue.update_progress(job_id, "tag_and_summarise", 60).await.ok();

        step(events, job_id, "embed");
        let search_text = crate::search::build_search_text(&preferred_text, MAX_SEARCH_TEXT_WORDS);
        let doc_embedding = self.embedder.embed_passage(&search_text).await.ok().flatten();
        let chunks = chunk_text(&document.title, &document.description, &preferred_text);
        for (index, content) in chunks.iter().enumerate() {
            if let Some(embedding) = self.embedder.embed_passage(content).await.ok().flatten() {
                self.vector_store
                    .upsert_chunk(document_id, index as i32, content, &document.title, &document.country, &embedding)
                    .await
                    .map_err(|e| ProcessingError::Retryable(e.to_string()))?;
            }
        }
        self.queue.update_progress(job_id, "embed", 90).await.ok();

        step(events, job_id, "finalise");
        let tags_json = serde_json::to_string(&tags).unwrap_or_else(|_| "[]".into());
        let embedding_bytes = doc_embedding.as_ref().map(|e| bincode::serialize(e).unwrap_or_default());
        self.documents
            .mark_processed(
                document_id,
                Some(&original_text),
                Some(&english_text),
                Some(&preferred_text),
                Some(&search_text),
                &tags_json,
                summary.as_deref(),
                embedding_bytes.as_deref(),
            )
            .await
            .map_err(|e| ProcessingError::Retryable(e.to_string()))?;
        self.queue.update_progress(job_id, "finalise", 100).await.ok();
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
enum ProcessingError {
    #[error("{0}")]
    Retryable(String),
    #[error("{0}")]
    Fatal(String),
}

fn step(events: &Option<UnboundedSender<PipelineEvent>>, job_id: i32, name: &'static str) {
    emit(events, PipelineEvent::StepStarted { job_id, step: name });
}

fn emit(events: &Option<UnboundedSender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

impl From<ProcessingError> for WorkQueueError {
    fn from(e: ProcessingError) -> Self {
        WorkQueueError::Other(e.to_string())
    }
}
