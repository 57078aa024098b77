//! Command-line entry points: `serve` runs the API, `worker` drains the job
//! queue, `migrate` applies schema migrations, `ban-word`/`unban-word` edit
//! the moderation denylist directly against the database.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::embedding::{Embedder, HttpEmbedder};
use crate::object_store::FsObjectStore;
use crate::ocr::TesseractBackend;
use crate::repository::diesel_pool::AsyncSqlitePool;
use crate::repository::{
    AnnotationRepository, BannedWordRepository, CommentRepository, DocumentRepository,
    RagQueryRepository,
};
use crate::summariser::Summariser;
use crate::translate::{HttpTranslator, IdentityTranslator, Translator};
use crate::vector_store::{SqliteVectorStore, VectorStore};
use crate::work_queue::{DbJobQueue, WorkQueue};

#[derive(Parser)]
#[command(name = "haqarch")]
#[command(about = "anonymous document-exposure archive")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    /// Drain the processing queue (OCR -> translate -> tag -> embed)
    Worker {
        #[arg(long, default_value = "2000")]
        poll_interval_ms: u64,
    },
    /// Apply pending database migrations
    Migrate,
    /// Add a word to the moderation denylist
    BanWord {
        word: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Remove a word from the moderation denylist
    UnbanWord { word: String },
}

pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Arc::new(Settings::from_env());

    match cli.command {
        Commands::Serve { bind } => cmd_serve(settings, bind).await,
        Commands::Worker { poll_interval_ms } => cmd_worker(settings, poll_interval_ms).await,
        Commands::Migrate => cmd_migrate(settings).await,
        Commands::BanWord { word, reason } => cmd_ban_word(settings, &word, reason.as_deref()).await,
        Commands::UnbanWord { word } => cmd_unban_word(settings, &word).await,
    }
}

async fn cmd_migrate(settings: Arc<Settings>) -> anyhow::Result<()> {
    crate::repository::run_migrations(&settings.database_url).await?;
    tracing::info!("migrations applied");
    Ok(())
}

async fn cmd_serve(settings: Arc<Settings>, bind_override: Option<String>) -> anyhow::Result<()> {
    crate::repository::run_migrations(&settings.database_url).await?;

    let pool = AsyncSqlitePool::new(&settings.database_url, 8);
    let documents = Arc::new(DocumentRepository::new(pool.clone()));
    let comments = Arc::new(CommentRepository::new(pool.clone()));
    let annotations = Arc::new(AnnotationRepository::new(pool.clone()));
    let banned_words = Arc::new(BannedWordRepository::new(pool.clone()));
    let rag_queries = Arc::new(RagQueryRepository::new(pool.clone()));

    let object_store: Arc<dyn crate::object_store::ObjectStore> =
        Arc::new(FsObjectStore::new(settings.documents_dir.clone()));
    let queue: Arc<dyn WorkQueue> = Arc::new(DbJobQueue::new(pool.clone()));
    let vector_store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(pool.clone()));
    let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(
        settings.embedding.endpoint.clone().unwrap_or_else(|| "http://localhost:8000".to_string()),
    ));
    let summariser = Arc::new(Summariser::new(settings.summariser.clone()));

    let state = crate::server::AppState::new(
        documents,
        comments,
        annotations,
        banned_words,
        rag_queries,
        object_store,
        queue,
        vector_store,
        embedder,
        summariser,
        settings.clone(),
    );

    let bind_addr = bind_override.unwrap_or_else(|| settings.bind_addr.clone());
    let router = crate::server::build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %bind_addr, "archive server listening");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn cmd_worker(settings: Arc<Settings>, poll_interval_ms: u64) -> anyhow::Result<()> {
    crate::repository::run_migrations(&settings.database_url).await?;

    let pool = AsyncSqlitePool::new(&settings.database_url, 8);
    let documents = Arc::new(DocumentRepository::new(pool.clone()));
    let banned_words_repo = BannedWordRepository::new(pool.clone());
    let banned_words: Vec<String> = banned_words_repo.list().await?.into_iter().map(|b| b.word).collect();

    let queue: Arc<dyn WorkQueue> = Arc::new(DbJobQueue::new(pool.clone()));
    let ocr: Arc<dyn crate::ocr::OcrBackend> = Arc::new(TesseractBackend::new());
    let translator: Arc<dyn Translator> = match &settings.translate.endpoint {
        Some(endpoint) => Arc::new(HttpTranslator::new(endpoint.clone())),
        None => Arc::new(IdentityTranslator),
    };
    let summariser = Arc::new(Summariser::new(settings.summariser.clone()));
    let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(
        settings.embedding.endpoint.clone().unwrap_or_else(|| "http://localhost:8000".to_string()),
    ));
    let vector_store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(pool.clone()));

    let runner = crate::work_queue::runner::PipelineRunner {
        queue,
        documents,
        ocr,
        translator,
        summariser,
        embedder,
        vector_store,
        banned_words,
    };

    tracing::info!("worker started, polling for jobs");
    runner.run_forever(None, tokio::time::Duration::from_millis(poll_interval_ms)).await;
    Ok(())
}

async fn cmd_ban_word(settings: Arc<Settings>, word: &str, reason: Option<&str>) -> anyhow::Result<()> {
    let pool = AsyncSqlitePool::new(&settings.database_url, 4);
    let repo = BannedWordRepository::new(pool);
    let banned = repo.ban(word, reason, "cli").await?;
    tracing::info!(word = %banned.word, "word banned");
    Ok(())
}

async fn cmd_unban_word(settings: Arc<Settings>, word: &str) -> anyhow::Result<()> {
    let pool = AsyncSqlitePool::new(&settings.database_url, 4);
    let repo = BannedWordRepository::new(pool);
    repo.unban(word).await?;
    tracing::info!(word, "word unbanned");
    Ok(())
}
