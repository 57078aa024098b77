//! Applies the cetane-managed schema migrations ahead of serving traffic.

use tracing::info;

use super::RepositoryError;

fn migration_error(msg: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Database(diesel::result::Error::QueryBuilderError(
        msg.to_string().into(),
    ))
}

/// Run pending migrations against `database_url`, dispatching on scheme.
pub async fn run_migrations(database_url: &str) -> Result<(), RepositoryError> {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        #[cfg(feature = "postgres")]
        {
            run_postgres_migrations(database_url).await
        }
        #[cfg(not(feature = "postgres"))]
        {
            Err(migration_error(
                "PostgreSQL support not compiled; rebuild with --features postgres",
            ))
        }
    } else {
        run_sqlite_migrations(database_url).await
    }
}

async fn run_sqlite_migrations(database_url: &str) -> Result<(), RepositoryError> {
    use cetane::backend::Sqlite;
    use cetane::migrator::{MigrationStateStore, Migrator};

    let url = database_url.strip_prefix("sqlite:").unwrap_or(database_url).to_string();

    tokio::task::spawn_blocking(move || {
        let conn = super::connect(std::path::Path::new(&url)).map_err(migration_error)?;
        let backend = Sqlite;
        let registry = crate::migrations::registry();
        let state = SqliteState::new(&conn)?;

        let mut migrator = Migrator::new(&registry, &backend, state);
        let applied = migrator
            .migrate_forward(|sql| conn.execute_batch(sql).map_err(|e| e.to_string()))
            .map_err(migration_error)?;

        for name in &applied {
            info!(migration = %name, "applied migration");
        }
        if applied.is_empty() {
            info!("no pending migrations");
        }
        Ok(())
    })
    .await
    .map_err(migration_error)?
}

#[cfg(feature = "postgres")]
async fn run_postgres_migrations(database_url: &str) -> Result<(), RepositoryError> {
    use cetane::backend::Postgres;
    use cetane::migrator::{MigrationStateStore, Migrator};
    use tokio_postgres::NoTls;

    let (client, connection) = tokio_postgres::connect(database_url, NoTls)
        .await
        .map_err(migration_error)?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(error = %e, "postgres migration connection closed with an error");
        }
    });

    let backend = Postgres;
    let registry = crate::migrations::registry();
    let state = PostgresState::new(&client).await?;

    let mut migrator = Migrator::new(&registry, &backend, state);
    let applied = migrator
        .migrate_forward(|sql| {
            let rt = tokio::runtime::Handle::current();
            std::thread::scope(|s| {
                s.spawn(|| {
                    rt.block_on(async { client.batch_execute(sql).await.map_err(|e| e.to_string()) })
                })
                .join()
                .map_err(|_| "migration thread panicked".to_string())?
            })
        })
        .map_err(migration_error)?;

    for name in &applied {
        info!(migration = %name, "applied migration");
    }
    if applied.is_empty() {
        info!("no pending migrations");
    }
    Ok(())
}

struct SqliteState<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> SqliteState<'a> {
    fn new(conn: &'a rusqlite::Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS __cetane_migrations (
                name TEXT PRIMARY KEY NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .map_err(migration_error)?;
        Ok(Self { conn })
    }
}

impl cetane::migrator::MigrationStateStore for SqliteState<'_> {
    fn applied_migrations(&mut self) -> Result<Vec<String>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM __cetane_migrations ORDER BY name")
            .map_err(|e| e.to_string())?;
        stmt.query_map([], |row| row.get(0))
            .map_err(|e| e.to_string())?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|e| e.to_string())
    }

    fn mark_applied(&mut self, name: &str) -> Result<(), String> {
        self.conn
            .execute("INSERT OR IGNORE INTO __cetane_migrations (name) VALUES (?1)", [name])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn mark_unapplied(&mut self, name: &str) -> Result<(), String> {
        self.conn
            .execute("DELETE FROM __cetane_migrations WHERE name = ?1", [name])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[cfg(feature = "postgres")]
struct PostgresState<'a> {
    client: &'a tokio_postgres::Client,
    applied: Vec<String>,
}

#[cfg(feature = "postgres")]
impl<'a> PostgresState<'a> {
    async fn new(client: &'a tokio_postgres::Client) -> Result<Self, RepositoryError> {
        client
            .execute(
                "CREATE TABLE IF NOT EXISTS __cetane_migrations (
                    name TEXT PRIMARY KEY NOT NULL,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )",
                &[],
            )
            .await
            .map_err(migration_error)?;
        let rows = client
            .query("SELECT name FROM __cetane_migrations ORDER BY name", &[])
            .await
            .map_err(migration_error)?;
        Ok(Self { client, applied: rows.iter().map(|r| r.get::<_, String>(0)).collect() })
    }
}

#[cfg(feature = "postgres")]
impl cetane::migrator::MigrationStateStore for PostgresState<'_> {
    fn applied_migrations(&mut self) -> Result<Vec<String>, String> {
        Ok(self.applied.clone())
    }

    fn mark_applied(&mut self, name: &str) -> Result<(), String> {
        let rt = tokio::runtime::Handle::current();
        std::thread::scope(|s| {
            s.spawn(|| {
                rt.block_on(async {
                    self.client
                        .execute(
                            "INSERT INTO __cetane_migrations (name) VALUES ($1) ON CONFLICT DO NOTHING",
                            &[&name],
                        )
                        .await
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
            })
            .join()
            .map_err(|_| "migration thread panicked".to_string())?
        })?;
        if !self.applied.contains(&name.to_string()) {
            self.applied.push(name.to_string());
        }
        Ok(())
    }

    fn mark_unapplied(&mut self, name: &str) -> Result<(), String> {
        let rt = tokio::runtime::Handle::current();
        std::thread::scope(|s| {
            s.spawn(|| {
                rt.block_on(async {
                    self.client
                        .execute("DELETE FROM __cetane_migrations WHERE name = $1", &[&name])
                        .await
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
            })
            .join()
            .map_err(|_| "migration thread panicked".to_string())?
        })?;
        self.applied.retain(|n| n != name);
        Ok(())
    }
}
