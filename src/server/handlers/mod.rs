mod admin;
mod health;
mod moderation;
mod rag;
mod read;
mod upload;

pub use admin::{approve_document, ban_word, queue_stats, reject_document, unban_word};
pub use health::healthz;
pub use moderation::{
    create_annotation, create_comment, delete_annotation, delete_comment, flag_comment,
    list_annotations, list_comments,
};
pub use rag::{rag_document_question, rag_question};
pub use read::{download, get_document, search};
pub use upload::{upload_multiple, upload_single};

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

/// Derives a stable-but-anonymous per-client hash from request fingerprint
/// bytes (user agent + accept-language), never from the IP address, so it
/// can gate rate limits and view suppression without tracking identity.
pub fn session_hash(headers: &HeaderMap) -> String {
    let mut hasher = Sha256::new();
    hasher.update(headers.get("user-agent").map(|v| v.as_bytes()).unwrap_or_default());
    hasher.update(b"|");
    hasher.update(headers.get("accept-language").map(|v| v.as_bytes()).unwrap_or_default());
    hex::encode(hasher.finalize())
}
