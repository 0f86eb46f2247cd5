//! Registry service handlers

use crate::{
    dto::{HealthResponse, ListToolsQuery, ListVersionsQuery, ResolveQuery, StatusUpdate},
    error::{ServerError, ServerResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use toolevo_core::{NewTool, NewToolVersion, Tool, ToolVersion, ToolWithVersions};
use toolevo_registry::{Registry, Resolution};

pub fn routes(registry: Registry) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools).post(create_tool))
        .route("/tools/:tool_id", get(get_tool))
        .route("/tools/:tool_id/versions", get(list_versions).post(create_version))
        .route("/tools/:tool_id/versions/:version_id", get(get_version))
        .route("/tools/:tool_id/versions/:version_id/status", patch(update_status))
        .route("/resolve", get(resolve))
        .with_state(registry)
}

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ServerError::InvalidInput(e.body_text()))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ServerResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|e| ServerError::InvalidInput(e.body_text()))
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok("toolevo-registry"))
}

/// POST /tools
async fn create_tool(
    State(registry): State<Registry>,
    payload: Result<Json<NewTool>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Tool>)> {
    let tool = registry.create_tool(json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(tool)))
}

/// GET /tools
async fn list_tools(
    State(registry): State<Registry>,
    params: Result<Query<ListToolsQuery>, QueryRejection>,
) -> ServerResult<Json<Vec<Tool>>> {
    let params = query(params)?;
    Ok(Json(registry.list_tools(params.search).await?))
}

/// GET /tools/:tool_id
async fn get_tool(
    State(registry): State<Registry>,
    Path(tool_id): Path<String>,
) -> ServerResult<Json<ToolWithVersions>> {
    let mut tool = registry.get_tool(&tool_id).await?;
    tool.versions = tool.versions.into_iter().map(ToolVersion::redacted).collect();
    Ok(Json(tool))
}

/// POST /tools/:tool_id/versions
async fn create_version(
    State(registry): State<Registry>,
    Path(tool_id): Path<String>,
    payload: Result<Json<NewToolVersion>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<ToolVersion>)> {
    let version = registry.create_version(&tool_id, json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(version.redacted())))
}

/// GET /tools/:tool_id/versions
async fn list_versions(
    State(registry): State<Registry>,
    Path(tool_id): Path<String>,
    params: Result<Query<ListVersionsQuery>, QueryRejection>,
) -> ServerResult<Json<Vec<ToolVersion>>> {
    let status = query(params)?.status()?;
    let versions = registry.list_versions(&tool_id, status).await?;
    Ok(Json(versions.into_iter().map(ToolVersion::redacted).collect()))
}

/// GET /tools/:tool_id/versions/:version_id
async fn get_version(
    State(registry): State<Registry>,
    Path((tool_id, version_id)): Path<(String, String)>,
) -> ServerResult<Json<ToolVersion>> {
    Ok(Json(registry.get_version(&tool_id, &version_id).await?.redacted()))
}

/// PATCH /tools/:tool_id/versions/:version_id/status
async fn update_status(
    State(registry): State<Registry>,
    Path((tool_id, version_id)): Path<(String, String)>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ServerResult<Json<ToolVersion>> {
    let update = json_body(payload)?;
    let version = registry.update_version_status(&tool_id, &version_id, update.status).await?;
    Ok(Json(version.redacted()))
}

/// GET /resolve?slug=...
///
/// Carries the full `auth_config`; the gateway needs it to call the endpoint.
async fn resolve(
    State(registry): State<Registry>,
    params: Result<Query<ResolveQuery>, QueryRejection>,
) -> ServerResult<Json<Resolution>> {
    let slug = query(params)?
        .slug
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServerError::InvalidInput("query parameter 'slug' is required".to_string()))?;
    Ok(Json(registry.resolve(&slug).await?))
}
