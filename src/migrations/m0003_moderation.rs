use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0003_moderation")
        .depends_on(&["0001_initial_schema"])
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    parent_comment_id INTEGER REFERENCES comments(id) ON DELETE CASCADE,
    comment_text TEXT NOT NULL,
    session_hash TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'approved',
    flag_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE comments (
    id SERIAL PRIMARY KEY,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    parent_comment_id INTEGER REFERENCES comments(id) ON DELETE CASCADE,
    comment_text TEXT NOT NULL,
    session_hash TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'approved',
    flag_count INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE INDEX idx_comments_document ON comments(document_id, status)",
                )
                .for_backend(
                    "postgres",
                    "CREATE INDEX idx_comments_document ON comments(document_id, status)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE annotations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    page_number INTEGER NOT NULL,
    x REAL NOT NULL,
    y REAL NOT NULL,
    width REAL NOT NULL,
    height REAL NOT NULL,
    highlighted_text TEXT,
    annotation_note TEXT,
    session_hash TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE annotations (
    id SERIAL PRIMARY KEY,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    page_number INTEGER NOT NULL,
    x DOUBLE PRECISION NOT NULL,
    y DOUBLE PRECISION NOT NULL,
    width DOUBLE PRECISION NOT NULL,
    height DOUBLE PRECISION NOT NULL,
    highlighted_text TEXT,
    annotation_note TEXT,
    session_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE INDEX idx_annotations_document ON annotations(document_id, page_number)",
                )
                .for_backend(
                    "postgres",
                    "CREATE INDEX idx_annotations_document ON annotations(document_id, page_number)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE view_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    session_hash TEXT NOT NULL,
    viewed_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE view_events (
    id SERIAL PRIMARY KEY,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    session_hash TEXT NOT NULL,
    viewed_at TIMESTAMPTZ NOT NULL DEFAULT now()
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE INDEX idx_view_events_lookup ON view_events(document_id, session_hash, viewed_at)",
                )
                .for_backend(
                    "postgres",
                    "CREATE INDEX idx_view_events_lookup ON view_events(document_id, session_hash, viewed_at)",
                ),
        )
}
