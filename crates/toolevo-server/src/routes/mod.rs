//! HTTP routers for each service

pub mod gateway;
pub mod orchestrator;
pub mod registry;

use crate::{middleware::RequestIdLayer, orchestrator::Orchestrator};
use axum::Router;
use std::sync::Arc;
use toolevo_gateway::ToolExecutor;
use toolevo_registry::Registry;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

fn layered(router: Router) -> Router {
    router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(RequestIdLayer))
}

/// Registry API: tool and version management plus `/resolve`
pub fn registry_router(registry: Registry) -> Router {
    layered(registry::routes(registry))
}

/// Gateway API: `POST /call`
pub fn gateway_router(executor: Arc<dyn ToolExecutor>) -> Router {
    layered(gateway::routes(executor))
}

/// Orchestrator API: `POST /execute`
pub fn orchestrator_router(orchestrator: Orchestrator) -> Router {
    layered(orchestrator::routes(orchestrator))
}
