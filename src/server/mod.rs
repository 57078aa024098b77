//! Axum HTTP surface: `AppState` holds `Arc`-wrapped repositories and
//! services, routes are assembled in [`routes`], handlers live in
//! [`handlers`], mirroring the teacher's server module shape.

mod handlers;
mod routes;

use std::sync::Arc;

use crate::config::Settings;
use crate::embedding::Embedder;
use crate::moderation::{InMemoryRateLimiter, ModerationService};
use crate::object_store::ObjectStore;
use crate::rag::RagService;
use crate::repository::{AnnotationRepository, BannedWordRepository, CommentRepository, DocumentRepository, RagQueryRepository};
use crate::search::SearchService;
use crate::work_queue::WorkQueue;

pub use routes::build_router;

#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<DocumentRepository>,
    pub banned_words: Arc<BannedWordRepository>,
    pub object_store: Arc<dyn ObjectStore>,
    pub queue: Arc<dyn WorkQueue>,
    pub embedder: Arc<dyn Embedder>,
    pub search: Arc<SearchService>,
    pub rag: Arc<RagService>,
    pub moderation: Arc<ModerationService>,
    pub upload_limiter: Arc<InMemoryRateLimiter>,
    pub download_limiter: Arc<InMemoryRateLimiter>,
    pub settings: Arc<Settings>,
}

#[allow(clippy::too_many_arguments)]
impl AppState {
    pub fn new(
        documents: Arc<DocumentRepository>,
        comments: Arc<CommentRepository>,
        annotations: Arc<AnnotationRepository>,
        banned_words: Arc<BannedWordRepository>,
        rag_queries: Arc<RagQueryRepository>,
        object_store: Arc<dyn ObjectStore>,
        queue: Arc<dyn WorkQueue>,
        vector_store: Arc<dyn crate::vector_store::VectorStore>,
        embedder: Arc<dyn Embedder>,
        summariser: Arc<crate::summariser::Summariser>,
        settings: Arc<Settings>,
    ) -> Self {
        let spam_filter = Arc::new(crate::moderation::SpamFilter::new(banned_words.clone()));
        let view_tracker = Arc::new(crate::moderation::ViewTracker::new());
        let moderation = Arc::new(ModerationService::new(comments, annotations, spam_filter, view_tracker));
        let search = Arc::new(SearchService::new(documents.clone(), vector_store.clone(), embedder.clone(), banned_words.clone()));
        let rag = Arc::new(RagService::new(documents.clone(), vector_store, embedder.clone(), summariser, rag_queries));

        Self {
            documents,
            banned_words,
            object_store,
            queue,
            embedder,
            search,
            rag,
            moderation,
            upload_limiter: Arc::new(InMemoryRateLimiter::new()),
            download_limiter: Arc::new(InMemoryRateLimiter::new()),
            settings,
        }
    }
}
