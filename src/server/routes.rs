use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/documents/search", get(handlers::search))
        .route("/documents/upload", post(handlers::upload_single))
        .route("/documents/upload-multiple", post(handlers::upload_multiple))
        .route("/documents/:id", get(handlers::get_document))
        .route("/documents/:id/download", get(handlers::download))
        .route("/documents/:id/comments", post(handlers::create_comment).get(handlers::list_comments))
        .route("/documents/:id/annotations", post(handlers::create_annotation).get(handlers::list_annotations))
        .route("/documents/:id/question", post(handlers::rag_document_question))
        .route("/comments/:id", delete(handlers::delete_comment))
        .route("/comments/:id/flag", post(handlers::flag_comment))
        .route("/annotations/:id", delete(handlers::delete_annotation))
        .route("/rag/question", post(handlers::rag_question))
        .route("/admin/documents/:id/approve", post(handlers::approve_document))
        .route("/admin/documents/:id/reject", post(handlers::reject_document))
        .route("/admin/queue/stats", get(handlers::queue_stats))
        .route("/admin/banned-words", post(handlers::ban_word))
        .route("/admin/banned-words/unban", post(handlers::unban_word))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
