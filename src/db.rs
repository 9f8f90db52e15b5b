use std::time::Duration;

use anyhow::Context;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection,
    sqlx::sqlite::{SqliteJournalMode, SqliteSynchronous},
};
use sea_orm_migration::MigratorTrait;

/// Opens the SQLite file behind `database_url` and brings its schema up to
/// date with `M`. Every pooled connection runs in WAL mode with
/// `synchronous=NORMAL` and foreign keys enforced.
pub async fn connect_and_migrate<M: MigratorTrait>(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options
        .max_connections(max_connections.max(1))
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false)
        .map_sqlx_sqlite_opts(|opts| {
            opts.journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .foreign_keys(true)
        });

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to open database {database_url}"))?;

    M::up(&db, None).await.context("failed to run migrations")?;
    Ok(db)
}
