//! Request and query DTOs

use crate::error::{ServerError, ServerResult};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use toolevo_core::VersionStatus;

/// `GET /tools?search=...`
#[derive(Debug, Default, Deserialize)]
pub struct ListToolsQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// `GET /tools/:tool_id/versions?status=...`
#[derive(Debug, Default, Deserialize)]
pub struct ListVersionsQuery {
    #[serde(default)]
    pub status: Option<String>,
}

impl ListVersionsQuery {
    pub fn status(&self) -> ServerResult<Option<VersionStatus>> {
        self.status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<VersionStatus>().map_err(ServerError::InvalidInput))
            .transpose()
    }
}

/// `GET /resolve?slug=...`
#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    #[serde(default)]
    pub slug: Option<String>,
}

/// `PATCH /tools/:tool_id/versions/:version_id/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: VersionStatus,
}

/// `POST /execute`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub slug: String,
    #[serde(default)]
    pub input: JsonValue,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn ok(service: &'static str) -> Self {
        Self { status: "ok", service, version: env!("CARGO_PKG_VERSION") }
    }
}
