use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0001_initial_schema").operation(
        RunSql::portable()
            .for_backend(
                "sqlite",
                r#"CREATE TABLE documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    country TEXT NOT NULL,
    state TEXT NOT NULL,
    description TEXT,
    document_language TEXT NOT NULL DEFAULT 'english',
    ocr_text_original TEXT,
    ocr_text_english TEXT,
    file_path TEXT NOT NULL,
    file_url TEXT NOT NULL,
    original_filename TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    content_type TEXT NOT NULL,
    ocr_text TEXT,
    generated_tags TEXT NOT NULL DEFAULT '[]',
    search_text TEXT,
    embedding BLOB,
    ai_summary TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    processed_at TEXT,
    approved_at TEXT,
    rejected_at TEXT,
    approved_by TEXT,
    rejected_by TEXT,
    rejection_reason TEXT,
    view_count INTEGER NOT NULL DEFAULT 0,
    hidden_from_top INTEGER NOT NULL DEFAULT 0
)"#,
            )
            .for_backend(
                "postgres",
                r#"CREATE TABLE documents (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    country TEXT NOT NULL,
    state TEXT NOT NULL,
    description TEXT,
    document_language TEXT NOT NULL DEFAULT 'english',
    ocr_text_original TEXT,
    ocr_text_english TEXT,
    file_path TEXT NOT NULL,
    file_url TEXT NOT NULL,
    original_filename TEXT NOT NULL,
    file_size BIGINT NOT NULL,
    content_type TEXT NOT NULL,
    ocr_text TEXT,
    generated_tags TEXT NOT NULL DEFAULT '[]',
    search_text TEXT,
    embedding BYTEA,
    ai_summary TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    processed_at TIMESTAMPTZ,
    approved_at TIMESTAMPTZ,
    rejected_at TIMESTAMPTZ,
    approved_by TEXT,
    rejected_by TEXT,
    rejection_reason TEXT,
    view_count INTEGER NOT NULL DEFAULT 0,
    hidden_from_top BOOLEAN NOT NULL DEFAULT false
)"#,
            ),
    )
    .operation(
        RunSql::portable()
            .for_backend(
                "sqlite",
                "CREATE INDEX idx_documents_status ON documents(status)",
            )
            .for_backend(
                "postgres",
                "CREATE INDEX idx_documents_status ON documents(status)",
            ),
    )
    .operation(
        RunSql::portable()
            .for_backend(
                "sqlite",
                "CREATE INDEX idx_documents_country ON documents(country)",
            )
            .for_backend(
                "postgres",
                "CREATE INDEX idx_documents_country ON documents(country)",
            ),
    )
    .operation(
        RunSql::portable()
            .for_backend(
                "sqlite",
                "CREATE INDEX idx_documents_created_at ON documents(created_at)",
            )
            .for_backend(
                "postgres",
                "CREATE INDEX idx_documents_created_at ON documents(created_at)",
            ),
    )
}
