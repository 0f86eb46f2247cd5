//! Toolevo Server
//!
//! HTTP surfaces for the registry, the gateway and the orchestrator. Each
//! service has its own router and can run alone or alongside the others in
//! one process.

pub mod app_state;
pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod orchestrator;
pub mod routes;

pub use app_state::AppState;
pub use config::{ServerConfig, ServiceRole};
pub use error::{ServerError, ServerResult};
pub use orchestrator::{Orchestrator, OrchestratorResponse};
pub use routes::{gateway_router, orchestrator_router, registry_router};

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

/// Bind `addr` and serve `router` until ctrl-c.
pub async fn serve_router(router: Router, addr: &str, service: &'static str) -> ServerResult<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| ServerError::Config(format!("Invalid address '{}': {}", addr, e)))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    serve_listener(router, listener, service).await
}

/// Serve on an already bound listener.
pub async fn serve_listener(
    router: Router,
    listener: TcpListener,
    service: &'static str,
) -> ServerResult<()> {
    let local = listener
        .local_addr()
        .map_err(|e| ServerError::Internal(format!("Listener has no address: {}", e)))?;
    tracing::info!(service, addr = %local, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!(service, "stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Run every service `role` asks for, each on its configured address.
///
/// Returns as soon as any service fails; the others are aborted.
pub async fn serve(state: AppState, cfg: &ServerConfig, role: ServiceRole) -> ServerResult<()> {
    let mut services = Vec::new();
    if role.serves_registry() {
        services.push((
            registry_router(state.require_registry()?),
            cfg.registry_addr.clone(),
            "toolevo-registry",
        ));
    }
    if role.serves_gateway() {
        services.push((
            gateway_router(state.require_executor()?),
            cfg.gateway_addr.clone(),
            "toolevo-gateway",
        ));
    }
    if role.serves_orchestrator() {
        services.push((
            orchestrator_router(state.orchestrator()?),
            cfg.orchestrator_addr.clone(),
            "toolevo-orchestrator",
        ));
    }
    if services.is_empty() {
        return Err(ServerError::Config("No services configured to run".to_string()));
    }

    let mut tasks = JoinSet::new();
    for (router, addr, service) in services {
        tasks.spawn(async move {
            serve_router(router, &addr, service).await.map_err(|e| (service, e))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err((service, e))) => {
                tracing::error!(service, error = %e, "service failed");
                tasks.abort_all();
                return Err(e);
            }
            Err(e) => {
                tasks.abort_all();
                return Err(ServerError::Internal(format!("Join error: {}", e)));
            }
        }
    }
    Ok(())
}
