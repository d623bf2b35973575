//! SQLite connection pool factory and module migration runner.

use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use folio_kernel::settings::DatabaseSettings;
use folio_kernel::{Migration, ModuleRegistry};

const LEDGER_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS _folio_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Open a SQLite pool for the configured database.
///
/// In-memory URLs get a single connection that is never recycled, since every
/// fresh connection would otherwise see its own empty database.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let started_at = Instant::now();
    tracing::info!(target: "folio-db", url = %settings.url, "opening database pool");

    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(settings.create_if_missing);

    let pool_options = if settings.is_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(settings.max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open database at '{}'", settings.url))?;

    tracing::info!(
        target: "folio-db",
        duration_ms = started_at.elapsed().as_millis() as u64,
        "database pool ready"
    );

    Ok(pool)
}

/// Apply every migration not yet recorded in the ledger table.
///
/// Each migration runs in its own transaction together with its ledger row,
/// so a failing migration leaves no trace. Returns the number applied.
pub async fn run_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::raw_sql(LEDGER_TABLE_SQL)
        .execute(pool)
        .await
        .context("failed to create migration ledger table")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let already_applied: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM _folio_migrations WHERE module = ? AND id = ?",
        )
        .bind(module.as_str())
        .bind(migration.id)
        .fetch_one(pool)
        .await
        .with_context(|| format!("failed to read ledger for {}/{}", module, migration.id))?;

        if already_applied > 0 {
            tracing::debug!(
                target: "folio-db",
                %module,
                migration = migration.id,
                "migration already applied"
            );
            continue;
        }

        let mut tx = pool.begin().await.context("failed to begin migration")?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;

        sqlx::query("INSERT INTO _folio_migrations (module, id) VALUES (?, ?)")
            .bind(module.as_str())
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration {}/{}", module, migration.id))?;

        tx.commit()
            .await
            .with_context(|| format!("failed to commit migration {}/{}", module, migration.id))?;

        tracing::info!(target: "folio-db", %module, migration = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

/// Open the pool and bring every registered module's schema up to date.
pub async fn bootstrap(
    settings: &DatabaseSettings,
    registry: &ModuleRegistry,
) -> anyhow::Result<SqlitePool> {
    let pool = connect(settings).await?;
    let migrations = registry.collect_migrations();
    let applied = run_migrations(&pool, &migrations).await?;
    tracing::info!(target: "folio-db", applied, total = migrations.len(), "migrations complete");
    Ok(pool)
}
