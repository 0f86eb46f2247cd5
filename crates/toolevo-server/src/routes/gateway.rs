//! Gateway service handlers

use crate::{dto::HealthResponse, error::ServerResult, routes::registry::json_body};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use toolevo_gateway::{CallRequest, GatewayResult, ToolExecutor};

pub fn routes(executor: Arc<dyn ToolExecutor>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/call", post(call))
        .with_state(executor)
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok("toolevo-gateway"))
}

/// POST /call
async fn call(
    State(executor): State<Arc<dyn ToolExecutor>>,
    payload: Result<Json<CallRequest>, JsonRejection>,
) -> ServerResult<Json<GatewayResult>> {
    let request = json_body(payload)?;
    Ok(Json(executor.execute(&request.slug, &request.input).await?))
}
