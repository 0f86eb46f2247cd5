use crate::error::{StoreError, StoreResult};
use crate::sql_store::migrations::MigrationRunner;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use toolevo_core::{
    AuthType, CoreResult, HttpMethod, Protocol, Tool, ToolListFilter, ToolStore, ToolVersion,
    ToolWithVersions, VersionStatus,
};

const VERSION_COLUMNS: &str = "seq, id, tool_id, version, status, input_schema, output_schema, \
     endpoint_protocol, endpoint_method, endpoint_url, auth_type, auth_config, \
     cost_per_call_usd, valid_from, valid_to, created_at, updated_at";

/// SQLite-based store implementation
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Create a new SqlStore with database URL and default pool configuration
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        Self::new_with_config(database_url, None).await
    }

    /// Create SqlStore with custom pool configuration
    pub async fn new_with_config(
        database_url: &str,
        max_connections: Option<u32>,
    ) -> StoreResult<Self> {
        let max_conn = max_connections.unwrap_or_else(|| {
            std::env::var("TOOLEVO_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10)
        });

        let pool = if let Some(path_str) = database_url.strip_prefix("sqlite://") {
            let path = PathBuf::from(path_str);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Corrupt(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
            SqlitePoolOptions::new()
                .max_connections(max_conn)
                .connect_with(options)
                .await?
        } else {
            // In-memory databases live only as long as a connection holds them,
            // so the pool keeps exactly one open.
            let options = SqliteConnectOptions::from_str(database_url)?
                .create_if_missing(true)
                .foreign_keys(true);
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        };

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(url = database_url, "sqlite store ready");
        Ok(store)
    }

    /// Create SqlStore from existing pool (for testing)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run migrations manually
    pub async fn migrate(&self) -> StoreResult<()> {
        MigrationRunner::new(self.pool.clone()).migrate().await
    }

    /// Close the pool, waiting for in-flight queries to finish
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_tool(row: &SqliteRow) -> StoreResult<Tool> {
    Ok(Tool {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        display_name: row.try_get("display_name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_version(row: &SqliteRow) -> StoreResult<ToolVersion> {
    let input_schema: String = row.try_get("input_schema")?;
    let output_schema: String = row.try_get("output_schema")?;
    let auth_config: Option<String> = row.try_get("auth_config")?;
    let status: String = row.try_get("status")?;
    let protocol: String = row.try_get("endpoint_protocol")?;
    let method: String = row.try_get("endpoint_method")?;
    let auth_type: String = row.try_get("auth_type")?;

    Ok(ToolVersion {
        id: row.try_get("id")?,
        tool_id: row.try_get("tool_id")?,
        seq: row.try_get("seq")?,
        version: row.try_get("version")?,
        status: VersionStatus::from_str(&status).map_err(StoreError::Corrupt)?,
        input_schema: serde_json::from_str(&input_schema)?,
        output_schema: serde_json::from_str(&output_schema)?,
        endpoint_protocol: Protocol::from_str(&protocol)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        endpoint_method: HttpMethod::from_str(&method)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        endpoint_url: row.try_get("endpoint_url")?,
        auth_type: AuthType::from_str(&auth_type).map_err(StoreError::Corrupt)?,
        auth_config: match auth_config {
            Some(text) => serde_json::from_str(&text)?,
            None => JsonValue::Null,
        },
        cost_per_call_usd: row.try_get("cost_per_call_usd")?,
        valid_from: row.try_get("valid_from")?,
        valid_to: row.try_get("valid_to")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn like_pattern(search: &str) -> String {
    let escaped = search
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ToolStore for SqlStore {
    async fn insert_tool(&self, tool: &Tool) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tools (id, slug, display_name, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tool.id)
        .bind(&tool.slug)
        .bind(&tool.display_name)
        .bind(&tool.description)
        .bind(tool.created_at)
        .bind(tool.updated_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        Ok(())
    }

    async fn get_tool(&self, id: &str) -> CoreResult<Option<Tool>> {
        let row = sqlx::query(
            "SELECT id, slug, display_name, description, created_at, updated_at FROM tools WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        Ok(row.as_ref().map(row_to_tool).transpose()?)
    }

    async fn list_tools(&self, filter: &ToolListFilter) -> CoreResult<Vec<Tool>> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let rows = sqlx::query(
            r#"
            SELECT id, slug, display_name, description, created_at, updated_at
            FROM tools
            WHERE ?1 IS NULL
               OR lower(slug) LIKE ?1 ESCAPE '\'
               OR lower(display_name) LIKE ?1 ESCAPE '\'
            ORDER BY rowid
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        let tools = rows.iter().map(row_to_tool).collect::<StoreResult<Vec<_>>>()?;
        Ok(tools)
    }

    async fn insert_version(&self, version: &ToolVersion) -> CoreResult<ToolVersion> {
        let input_schema =
            serde_json::to_string(&version.input_schema).map_err(StoreError::Serialization)?;
        let output_schema =
            serde_json::to_string(&version.output_schema).map_err(StoreError::Serialization)?;
        let auth_config = if version.auth_config.is_null() {
            None
        } else {
            Some(serde_json::to_string(&version.auth_config).map_err(StoreError::Serialization)?)
        };

        let result = sqlx::query(
            r#"
            INSERT INTO tool_versions (
                id, tool_id, version, status, input_schema, output_schema,
                endpoint_protocol, endpoint_method, endpoint_url, auth_type, auth_config,
                cost_per_call_usd, valid_from, valid_to, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&version.id)
        .bind(&version.tool_id)
        .bind(&version.version)
        .bind(version.status.as_str())
        .bind(&input_schema)
        .bind(&output_schema)
        .bind(version.endpoint_protocol.scheme())
        .bind(version.endpoint_method.as_str())
        .bind(&version.endpoint_url)
        .bind(version.auth_type.as_str())
        .bind(&auth_config)
        .bind(&version.cost_per_call_usd)
        .bind(version.valid_from)
        .bind(version.valid_to)
        .bind(version.created_at)
        .bind(version.updated_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        let mut stored = version.clone();
        stored.seq = result.last_insert_rowid();
        Ok(stored)
    }

    async fn get_version(&self, tool_id: &str, version_id: &str) -> CoreResult<Option<ToolVersion>> {
        let sql = format!(
            "SELECT {} FROM tool_versions WHERE tool_id = ? AND id = ?",
            VERSION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(tool_id)
            .bind(version_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Database)?;

        Ok(row.as_ref().map(row_to_version).transpose()?)
    }

    async fn list_versions(
        &self,
        tool_id: &str,
        status: Option<VersionStatus>,
    ) -> CoreResult<Vec<ToolVersion>> {
        let sql = format!(
            "SELECT {} FROM tool_versions WHERE tool_id = ?1 AND (?2 IS NULL OR status = ?2) ORDER BY seq",
            VERSION_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(tool_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Database)?;

        let versions = rows.iter().map(row_to_version).collect::<StoreResult<Vec<_>>>()?;
        Ok(versions)
    }

    async fn update_version_status(
        &self,
        tool_id: &str,
        version_id: &str,
        expected: VersionStatus,
        status: VersionStatus,
        updated_at: DateTime<Utc>,
    ) -> CoreResult<Option<ToolVersion>> {
        let result = sqlx::query(
            "UPDATE tool_versions SET status = ?, updated_at = ? \
             WHERE tool_id = ? AND id = ? AND status = ?",
        )
        .bind(status.as_str())
        .bind(updated_at)
        .bind(tool_id)
        .bind(version_id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(StoreError::Database)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_version(tool_id, version_id).await
    }

    async fn load_by_slug(&self, slug: &str) -> CoreResult<Option<ToolWithVersions>> {
        // One transaction so the tool and its versions come from the same snapshot.
        let mut tx = self.pool.begin().await.map_err(StoreError::Database)?;

        let tool_row = sqlx::query(
            "SELECT id, slug, display_name, description, created_at, updated_at FROM tools WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StoreError::Database)?;

        let Some(tool_row) = tool_row else {
            tx.commit().await.map_err(StoreError::Database)?;
            return Ok(None);
        };
        let tool = row_to_tool(&tool_row)?;

        let sql = format!(
            "SELECT {} FROM tool_versions WHERE tool_id = ? ORDER BY seq",
            VERSION_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(&tool.id)
            .fetch_all(&mut *tx)
            .await
            .map_err(StoreError::Database)?;
        tx.commit().await.map_err(StoreError::Database)?;

        let versions = rows.iter().map(row_to_version).collect::<StoreResult<Vec<_>>>()?;
        Ok(Some(ToolWithVersions { tool, versions }))
    }
}
