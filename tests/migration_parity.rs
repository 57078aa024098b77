//! Confirms the cetane migration registry actually produces the schema the
//! rest of the crate assumes: every table/column `schema.rs` declares exists
//! after running migrations forward against a fresh SQLite database, and the
//! Postgres SQL generation path never leaks SQLite-only syntax.

use std::collections::{BTreeMap, BTreeSet};

use cetane::backend::{Postgres, Sqlite};
use rusqlite::{Connection, Result as SqliteResult};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnInfo {
    col_type: String,
    not_null: bool,
    primary_key: bool,
}

fn extract_tables(conn: &Connection) -> SqliteResult<BTreeMap<String, BTreeMap<String, ColumnInfo>>> {
    let mut tables = BTreeMap::new();

    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '__cetane%' ORDER BY name",
    )?;
    let table_names: Vec<String> = stmt.query_map([], |row| row.get(0))?.collect::<SqliteResult<Vec<_>>>()?;

    for table_name in table_names {
        let mut columns = BTreeMap::new();
        let mut pragma = conn.prepare(&format!("PRAGMA table_info(\"{}\")", table_name))?;
        let column_iter = pragma.query_map([], |row| {
            Ok((
                row.get::<_, String>(1)?,
                ColumnInfo {
                    col_type: row.get::<_, String>(2)?.to_uppercase(),
                    not_null: row.get(3)?,
                    primary_key: row.get::<_, i32>(5)? > 0,
                },
            ))
        })?;
        for col in column_iter {
            let (name, info) = col?;
            columns.insert(name, info);
        }
        tables.insert(table_name, columns);
    }

    Ok(tables)
}

fn apply_registry_to_sqlite(conn: &Connection) {
    let registry = haqarch::migrations::registry();
    let backend = Sqlite;
    let ordered_names = registry.resolve_order().expect("failed to resolve migration order");

    for name in ordered_names {
        let migration = registry.get(name).expect("migration not found after resolve");
        for stmt in migration.forward_sql(&backend) {
            if stmt.trim().is_empty() {
                continue;
            }
            conn.execute_batch(&stmt)
                .unwrap_or_else(|e| panic!("migration {} failed: {}\nSQL: {}", migration.name, e, stmt));
        }
    }
}

#[test]
fn migrations_produce_every_table_schema_rs_expects() {
    let conn = Connection::open_in_memory().expect("failed to open in-memory db");
    apply_registry_to_sqlite(&conn);

    let tables = extract_tables(&conn).expect("failed to extract tables");

    let expected: BTreeSet<&str> = [
        "documents",
        "document_chunks",
        "jobs",
        "comments",
        "annotations",
        "banned_words",
        "rag_queries",
        "view_events",
    ]
    .into_iter()
    .collect();

    let actual: BTreeSet<&str> = tables.keys().map(String::as_str).collect();

    let missing: Vec<_> = expected.difference(&actual).collect();
    assert!(missing.is_empty(), "tables missing after migration: {:?}", missing);
}

#[test]
fn documents_table_has_expected_primary_key_and_not_null_columns() {
    let conn = Connection::open_in_memory().expect("failed to open in-memory db");
    apply_registry_to_sqlite(&conn);

    let tables = extract_tables(&conn).expect("failed to extract tables");
    let documents = tables.get("documents").expect("documents table missing");

    let id = documents.get("id").expect("documents.id missing");
    assert!(id.primary_key, "documents.id should be the primary key");

    for required in ["title", "country", "state", "file_path", "file_url", "status"] {
        let col = documents
            .get(required)
            .unwrap_or_else(|| panic!("documents.{} missing", required));
        assert!(col.not_null, "documents.{} should be NOT NULL", required);
    }
}

#[test]
fn document_chunks_embedding_column_is_not_null_blob() {
    let conn = Connection::open_in_memory().expect("failed to open in-memory db");
    apply_registry_to_sqlite(&conn);

    let tables = extract_tables(&conn).expect("failed to extract tables");
    let chunks = tables.get("document_chunks").expect("document_chunks table missing");
    let embedding = chunks.get("embedding").expect("document_chunks.embedding missing");
    assert!(embedding.not_null);
    assert!(embedding.col_type.contains("BLOB"));
}

#[test]
fn each_migration_generates_valid_sqlite_sql_in_dependency_order() {
    let registry = haqarch::migrations::registry();
    let backend = Sqlite;
    let ordered_names = registry.resolve_order().expect("failed to resolve migration order");

    for (i, name) in ordered_names.iter().enumerate() {
        let conn = Connection::open_in_memory().expect("failed to open db");

        for prior_name in &ordered_names[..=i] {
            let migration = registry.get(prior_name).expect("migration not found");
            for stmt in migration.forward_sql(&backend) {
                if stmt.trim().is_empty() {
                    continue;
                }
                conn.execute_batch(&stmt)
                    .unwrap_or_else(|e| panic!("migration {} failed: {}\nSQL: {}", migration.name, e, stmt));
            }
        }

        let migration = registry.get(name).expect("migration not found");
        assert!(
            !migration.forward_sql(&backend).is_empty(),
            "migration {} produced no SQL",
            migration.name
        );
    }
}

#[test]
fn postgres_sql_never_uses_sqlite_autoincrement() {
    let registry = haqarch::migrations::registry();
    let backend = Postgres;
    let ordered_names = registry.resolve_order().expect("failed to resolve migration order");

    for name in ordered_names {
        let migration = registry.get(name).expect("migration not found");
        let statements = migration.forward_sql(&backend);
        assert!(!statements.is_empty(), "migration {} produced no Postgres SQL", migration.name);

        for stmt in &statements {
            assert!(
                !stmt.to_uppercase().contains("AUTOINCREMENT"),
                "migration {} uses AUTOINCREMENT in Postgres SQL (should be SERIAL)",
                migration.name
            );
        }
    }
}
