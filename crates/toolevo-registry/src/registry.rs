//! Registry service: owns tool and version records and resolves slugs

use crate::{
    error::{RegistryError, RegistryResult},
    validation::{validate_slug, validate_version},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toolevo_core::{
    select_active_version, CoreError, NewTool, NewToolVersion, Tool, ToolListFilter, ToolStore,
    ToolVersion, ToolWithVersions, VersionStatus,
};

/// Outcome of resolving a slug: the tool and the version calls are routed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub tool: Tool,
    pub version: ToolVersion,
}

/// Registry of tools and their versions on top of a [`ToolStore`]
#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn ToolStore>,
}

impl Registry {
    /// Create a new registry with a store backend
    pub fn new<S>(store: S) -> Self
    where
        S: ToolStore + 'static,
    {
        Self { store: Arc::new(store) }
    }

    /// Register a new tool
    pub async fn create_tool(&self, payload: NewTool) -> RegistryResult<Tool> {
        validate_slug(&payload.slug)?;

        let now = Utc::now();
        let tool = Tool {
            id: uuid::Uuid::new_v4().to_string(),
            slug: payload.slug,
            display_name: payload.display_name,
            description: payload.description,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_tool(&tool).await.map_err(|e| match e {
            CoreError::Conflict(_) => RegistryError::DuplicateSlug(tool.slug.clone()),
            other => other.into(),
        })?;

        tracing::info!(tool_id = %tool.id, slug = %tool.slug, "tool registered");
        Ok(tool)
    }

    /// Register a new version of an existing tool. Status defaults to `draft`.
    pub async fn create_version(
        &self,
        tool_id: &str,
        payload: NewToolVersion,
    ) -> RegistryResult<ToolVersion> {
        if self.store.get_tool(tool_id).await?.is_none() {
            return Err(RegistryError::ToolNotFound(tool_id.to_string()));
        }
        let descriptor = validate_version(&payload)?;

        let now = Utc::now();
        let version = ToolVersion {
            id: uuid::Uuid::new_v4().to_string(),
            tool_id: tool_id.to_string(),
            seq: 0,
            version: payload.version,
            status: payload.status.unwrap_or_default(),
            input_schema: payload.input_schema,
            output_schema: payload.output_schema,
            endpoint_protocol: descriptor.protocol,
            endpoint_method: descriptor.method,
            endpoint_url: descriptor.url,
            auth_type: descriptor.auth_type,
            auth_config: descriptor.auth_config,
            cost_per_call_usd: payload.cost_per_call_usd,
            valid_from: payload.valid_from,
            valid_to: payload.valid_to,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert_version(&version).await.map_err(|e| match e {
            CoreError::Conflict(_) => RegistryError::DuplicateVersion {
                tool_id: version.tool_id.clone(),
                version: version.version.clone(),
            },
            CoreError::NotFound(_) => RegistryError::ToolNotFound(version.tool_id.clone()),
            other => other.into(),
        })?;

        tracing::info!(
            tool_id = %stored.tool_id,
            version_id = %stored.id,
            version = %stored.version,
            status = %stored.status,
            "tool version registered"
        );
        Ok(stored)
    }

    /// List tools in registration order
    pub async fn list_tools(&self, search: Option<String>) -> RegistryResult<Vec<Tool>> {
        Ok(self.store.list_tools(&ToolListFilter { search }).await?)
    }

    /// Get a tool with all of its versions
    pub async fn get_tool(&self, tool_id: &str) -> RegistryResult<ToolWithVersions> {
        let tool = self
            .store
            .get_tool(tool_id)
            .await?
            .ok_or_else(|| RegistryError::ToolNotFound(tool_id.to_string()))?;
        let versions = self.store.list_versions(tool_id, None).await?;
        Ok(ToolWithVersions { tool, versions })
    }

    /// List the versions of a tool in registration order
    pub async fn list_versions(
        &self,
        tool_id: &str,
        status: Option<VersionStatus>,
    ) -> RegistryResult<Vec<ToolVersion>> {
        if self.store.get_tool(tool_id).await?.is_none() {
            return Err(RegistryError::ToolNotFound(tool_id.to_string()));
        }
        Ok(self.store.list_versions(tool_id, status).await?)
    }

    pub async fn get_version(&self, tool_id: &str, version_id: &str) -> RegistryResult<ToolVersion> {
        if self.store.get_tool(tool_id).await?.is_none() {
            return Err(RegistryError::ToolNotFound(tool_id.to_string()));
        }
        self.store
            .get_version(tool_id, version_id)
            .await?
            .ok_or_else(|| RegistryError::VersionNotFound {
                tool_id: tool_id.to_string(),
                version_id: version_id.to_string(),
            })
    }

    /// Move a version along `draft -> active -> deprecated`.
    ///
    /// Setting the current status again returns the version unchanged. The
    /// write only lands if the status is still the one the check was made
    /// against; otherwise the version is re-read and the check repeated.
    pub async fn update_version_status(
        &self,
        tool_id: &str,
        version_id: &str,
        status: VersionStatus,
    ) -> RegistryResult<ToolVersion> {
        loop {
            let current = self.get_version(tool_id, version_id).await?;
            if current.status == status {
                return Ok(current);
            }
            if !current.status.can_transition_to(status) {
                return Err(RegistryError::InvalidStatusTransition { from: current.status, to: status });
            }

            let Some(updated) = self
                .store
                .update_version_status(tool_id, version_id, current.status, status, Utc::now())
                .await?
            else {
                // Another writer moved the status first
                tracing::debug!(tool_id, version_id, seen = %current.status, "status changed concurrently");
                continue;
            };

            tracing::info!(
                tool_id,
                version_id,
                from = %current.status,
                to = %updated.status,
                "version status changed"
            );
            return Ok(updated);
        }
    }

    /// Resolve a slug to its tool and the version calls should use.
    pub async fn resolve(&self, slug: &str) -> RegistryResult<Resolution> {
        let loaded = self
            .store
            .load_by_slug(slug)
            .await?
            .ok_or_else(|| RegistryError::ToolNotFound(slug.to_string()))?;

        let version = select_active_version(&loaded.versions)
            .cloned()
            .ok_or_else(|| RegistryError::NoActiveVersion(slug.to_string()))?;

        tracing::debug!(
            slug,
            version_id = %version.id,
            version = %version.version,
            candidates = loaded.versions.len(),
            "slug resolved"
        );
        Ok(Resolution { tool: loaded.tool, version })
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}
