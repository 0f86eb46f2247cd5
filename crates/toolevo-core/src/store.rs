use crate::error::CoreResult;
use crate::types::{Tool, ToolVersion, ToolWithVersions, VersionStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Filter for listing tools
#[derive(Debug, Clone, Default)]
pub struct ToolListFilter {
    /// Case-insensitive substring matched against slug or display name
    pub search: Option<String>,
}

/// Persistent store of tools and their versions.
///
/// Inserts must enforce slug uniqueness and `(tool_id, version)` uniqueness,
/// reporting violations as `CoreError::Conflict`. Lists are returned in
/// insertion order.
#[async_trait]
pub trait ToolStore: Send + Sync {
    /// Insert a new tool
    async fn insert_tool(&self, tool: &Tool) -> CoreResult<()>;
    /// Get a tool by id
    async fn get_tool(&self, id: &str) -> CoreResult<Option<Tool>>;
    /// List tools, optionally filtered
    async fn list_tools(&self, filter: &ToolListFilter) -> CoreResult<Vec<Tool>>;
    /// Insert a new version; the returned record carries the assigned `seq`
    async fn insert_version(&self, version: &ToolVersion) -> CoreResult<ToolVersion>;
    /// Get a version of a tool by id
    async fn get_version(&self, tool_id: &str, version_id: &str) -> CoreResult<Option<ToolVersion>>;
    /// List the versions of a tool, optionally restricted to one status
    async fn list_versions(
        &self,
        tool_id: &str,
        status: Option<VersionStatus>,
    ) -> CoreResult<Vec<ToolVersion>>;
    /// Set the status of a version only if it is still `expected`.
    ///
    /// Returns `None` when the version does not exist or its status has
    /// changed since it was read; the check and the write are one atomic step.
    async fn update_version_status(
        &self,
        tool_id: &str,
        version_id: &str,
        expected: VersionStatus,
        status: VersionStatus,
        updated_at: DateTime<Utc>,
    ) -> CoreResult<Option<ToolVersion>>;
    /// Load a tool by slug together with all its versions in one consistent read
    async fn load_by_slug(&self, slug: &str) -> CoreResult<Option<ToolWithVersions>>;
}
