use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0004_banned_words_and_rag")
        .depends_on(&["0001_initial_schema"])
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE banned_words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL UNIQUE,
    reason TEXT,
    banned_by TEXT NOT NULL,
    banned_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE banned_words (
    id SERIAL PRIMARY KEY,
    word TEXT NOT NULL UNIQUE,
    reason TEXT,
    banned_by TEXT NOT NULL,
    banned_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE rag_queries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    query_text TEXT NOT NULL,
    answer_text TEXT,
    confidence_score REAL,
    sources_count INTEGER,
    response_time_ms INTEGER,
    document_scope INTEGER,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE rag_queries (
    id SERIAL PRIMARY KEY,
    query_text TEXT NOT NULL,
    answer_text TEXT,
    confidence_score REAL,
    sources_count INTEGER,
    response_time_ms INTEGER,
    document_scope INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE INDEX idx_rag_queries_created_at ON rag_queries(created_at)",
                )
                .for_backend(
                    "postgres",
                    "CREATE INDEX idx_rag_queries_created_at ON rag_queries(created_at)",
                ),
        )
}
