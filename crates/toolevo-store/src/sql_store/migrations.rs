use crate::error::StoreResult;
use sqlx::SqlitePool;

/// Ordered list of (version, name, script)
const MIGRATIONS: &[(i64, &str, &str)] = &[
    (1, "001_initial_schema", include_str!("../../migrations/001_initial_schema.sql")),
    (2, "002_version_metadata", include_str!("../../migrations/002_version_metadata.sql")),
];

/// Database migration manager
pub struct MigrationRunner {
    pool: SqlitePool,
}

impl MigrationRunner {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run all pending migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        let applied_versions: Vec<i64> =
            sqlx::query_scalar("SELECT version FROM _migrations ORDER BY version")
                .fetch_all(&self.pool)
                .await?;

        for (version, name, script) in MIGRATIONS {
            if applied_versions.contains(version) {
                continue;
            }
            self.apply(*version, name, script).await?;
            tracing::info!(version = *version, name = *name, "applied migration");
        }

        Ok(())
    }

    async fn apply(&self, version: i64, name: &str, script: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for statement in split_statements(script) {
            sqlx::query(&statement).execute(&mut *tx).await?;
        }

        sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
            .bind(version)
            .bind(name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Split a migration script into statements, dropping comment-only lines.
fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut buffer = String::new();

    for raw_line in script.lines() {
        let line = raw_line.trim_end();
        if line.trim_start().starts_with("--") || (buffer.is_empty() && line.trim().is_empty()) {
            continue;
        }
        buffer.push_str(line);
        buffer.push('\n');

        if line.ends_with(';') {
            let stmt = buffer.trim().to_string();
            if !stmt.is_empty() {
                statements.push(stmt);
            }
            buffer.clear();
        }
    }

    let trailing = buffer.trim();
    if !trailing.is_empty() {
        statements.push(trailing.to_string());
    }

    statements
}
