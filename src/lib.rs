//! Anonymous document-exposure archive: upload intake, background OCR/
//! translation/tagging/summarisation/embedding pipeline, hybrid search, a
//! retrieval-augmented question answerer, and an anonymous moderation
//! surface over comments and annotations.

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod migrations;
pub mod models;
pub mod moderation;
pub mod object_store;
pub mod ocr;
pub mod rag;
pub mod repository;
pub mod sanitiser;
pub mod schema;
pub mod search;
pub mod server;
pub mod summariser;
pub mod tagger;
pub mod translate;
pub mod vector_store;
pub mod work_queue;
