use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use toolevo_core::{
    CoreError, CoreResult, Tool, ToolListFilter, ToolStore, ToolVersion, ToolWithVersions,
    VersionStatus,
};

#[derive(Debug, Default)]
struct MemoryState {
    // Both vectors are kept in insertion order.
    tools: Vec<Tool>,
    versions: Vec<ToolVersion>,
    next_seq: i64,
}

/// In-memory implementation of ToolStore for testing and ephemeral deployments
#[derive(Debug, Clone, Default)]
pub struct MemoryToolStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryToolStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(tool: &Tool, needle: &str) -> bool {
    tool.slug.to_lowercase().contains(needle) || tool.display_name.to_lowercase().contains(needle)
}

#[async_trait]
impl ToolStore for MemoryToolStore {
    async fn insert_tool(&self, tool: &Tool) -> CoreResult<()> {
        let mut state = self.state.write().await;
        if state.tools.iter().any(|t| t.slug == tool.slug) {
            return Err(CoreError::Conflict(format!("slug '{}' already exists", tool.slug)));
        }
        if state.tools.iter().any(|t| t.id == tool.id) {
            return Err(CoreError::Conflict(format!("tool id '{}' already exists", tool.id)));
        }
        state.tools.push(tool.clone());
        Ok(())
    }

    async fn get_tool(&self, id: &str) -> CoreResult<Option<Tool>> {
        let state = self.state.read().await;
        Ok(state.tools.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tools(&self, filter: &ToolListFilter) -> CoreResult<Vec<Tool>> {
        let state = self.state.read().await;
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let tools = state
            .tools
            .iter()
            .filter(|t| needle.as_deref().map_or(true, |n| matches_search(t, n)))
            .cloned()
            .collect();
        Ok(tools)
    }

    async fn insert_version(&self, version: &ToolVersion) -> CoreResult<ToolVersion> {
        let mut state = self.state.write().await;
        if !state.tools.iter().any(|t| t.id == version.tool_id) {
            return Err(CoreError::NotFound(format!("tool '{}'", version.tool_id)));
        }
        if state
            .versions
            .iter()
            .any(|v| v.tool_id == version.tool_id && v.version == version.version)
        {
            return Err(CoreError::Conflict(format!(
                "version '{}' already exists for tool '{}'",
                version.version, version.tool_id
            )));
        }
        if state.versions.iter().any(|v| v.id == version.id) {
            return Err(CoreError::Conflict(format!("version id '{}' already exists", version.id)));
        }

        state.next_seq += 1;
        let mut stored = version.clone();
        stored.seq = state.next_seq;
        state.versions.push(stored.clone());
        Ok(stored)
    }

    async fn get_version(&self, tool_id: &str, version_id: &str) -> CoreResult<Option<ToolVersion>> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .iter()
            .find(|v| v.tool_id == tool_id && v.id == version_id)
            .cloned())
    }

    async fn list_versions(
        &self,
        tool_id: &str,
        status: Option<VersionStatus>,
    ) -> CoreResult<Vec<ToolVersion>> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .iter()
            .filter(|v| v.tool_id == tool_id)
            .filter(|v| status.map_or(true, |s| v.status == s))
            .cloned()
            .collect())
    }

    async fn update_version_status(
        &self,
        tool_id: &str,
        version_id: &str,
        expected: VersionStatus,
        status: VersionStatus,
        updated_at: DateTime<Utc>,
    ) -> CoreResult<Option<ToolVersion>> {
        let mut state = self.state.write().await;
        let Some(version) = state
            .versions
            .iter_mut()
            .find(|v| v.tool_id == tool_id && v.id == version_id && v.status == expected)
        else {
            return Ok(None);
        };
        version.status = status;
        version.updated_at = updated_at;
        Ok(Some(version.clone()))
    }

    async fn load_by_slug(&self, slug: &str) -> CoreResult<Option<ToolWithVersions>> {
        let state = self.state.read().await;
        let Some(tool) = state.tools.iter().find(|t| t.slug == slug) else {
            return Ok(None);
        };
        let versions = state
            .versions
            .iter()
            .filter(|v| v.tool_id == tool.id)
            .cloned()
            .collect();
        Ok(Some(ToolWithVersions { tool: tool.clone(), versions }))
    }
}
