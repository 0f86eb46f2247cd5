//! Orchestrator service handlers

use crate::{
    dto::{ExecuteRequest, HealthResponse},
    middleware::RequestId,
    orchestrator::{Orchestrator, OrchestratorResponse},
    routes::registry::json_body,
};
use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};

pub fn routes(orchestrator: Orchestrator) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/execute", post(execute))
        .with_state(orchestrator)
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok("toolevo-orchestrator"))
}

/// POST /execute
async fn execute(
    State(orchestrator): State<Orchestrator>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    if let Some(Extension(id)) = &request_id {
        tracing::debug!(request_id = id.as_str(), slug = %request.slug, "execute requested");
    }

    let response = orchestrator.execute(&request.slug, &request.input).await;
    let status = StatusCode::from_u16(response.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json::<OrchestratorResponse>(response)).into_response()
}

