//! Application state wiring the services for one process

use crate::{
    config::{ServerConfig, ServiceRole},
    error::{ServerError, ServerResult},
    orchestrator::Orchestrator,
};
use std::sync::Arc;
use toolevo_gateway::{DispatchConfig, Gateway, HttpDispatcher, RemoteGateway, ToolExecutor};
use toolevo_registry::{Registry, RemoteRegistry, ToolResolver};
use toolevo_store::SqlStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Present when this process owns the registry store
    pub registry: Option<Registry>,
    /// What `/call` and `/execute` run against
    pub executor: Option<Arc<dyn ToolExecutor>>,
}

impl AppState {
    /// Fully in-process wiring: registry, gateway and orchestrator share one store.
    pub fn local(registry: Registry, dispatch: DispatchConfig) -> ServerResult<Self> {
        let dispatcher = HttpDispatcher::new(dispatch)?;
        let resolver: Arc<dyn ToolResolver> = Arc::new(registry.clone());
        let gateway = Gateway::new(resolver, dispatcher);
        Ok(Self { registry: Some(registry), executor: Some(Arc::new(gateway)) })
    }

    /// Build the state a process running `role` needs.
    ///
    /// `All` ignores `registry_url` and `gateway_url`. A standalone gateway
    /// resolves through `registry_url` when set, a standalone orchestrator
    /// calls `gateway_url` when set; otherwise the local store is opened.
    pub async fn from_config(cfg: &ServerConfig, role: ServiceRole) -> ServerResult<Self> {
        match role {
            ServiceRole::All => {
                let registry = open_registry(cfg).await?;
                Self::local(registry, cfg.dispatch_config())
            }
            ServiceRole::Registry => {
                let registry = open_registry(cfg).await?;
                Ok(Self { registry: Some(registry), executor: None })
            }
            ServiceRole::Gateway => {
                let executor = local_gateway(cfg).await?;
                Ok(Self { registry: None, executor: Some(executor) })
            }
            ServiceRole::Orchestrator => {
                let executor: Arc<dyn ToolExecutor> = match &cfg.gateway_url {
                    Some(url) => {
                        tracing::info!(gateway_url = %url, "orchestrator using remote gateway");
                        Arc::new(RemoteGateway::new(url, cfg.service_timeout())?)
                    }
                    None => local_gateway(cfg).await?,
                };
                Ok(Self { registry: None, executor: Some(executor) })
            }
        }
    }

    pub fn require_registry(&self) -> ServerResult<Registry> {
        self.registry
            .clone()
            .ok_or_else(|| ServerError::Config("registry is not available in this process".into()))
    }

    pub fn require_executor(&self) -> ServerResult<Arc<dyn ToolExecutor>> {
        self.executor
            .clone()
            .ok_or_else(|| ServerError::Config("gateway is not available in this process".into()))
    }

    pub fn orchestrator(&self) -> ServerResult<Orchestrator> {
        Ok(Orchestrator::new(self.require_executor()?))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry.is_some())
            .field("executor", &self.executor.is_some())
            .finish()
    }
}

/// Open the store, apply migrations and wrap it in a registry.
pub async fn open_registry(cfg: &ServerConfig) -> ServerResult<Registry> {
    let store = SqlStore::new_with_config(&cfg.database_url, Some(cfg.max_connections)).await?;
    store.migrate().await?;
    tracing::info!(database_url = %cfg.database_url, "store ready");
    Ok(Registry::new(store))
}

async fn local_gateway(cfg: &ServerConfig) -> ServerResult<Arc<dyn ToolExecutor>> {
    let resolver: Arc<dyn ToolResolver> = match &cfg.registry_url {
        Some(url) => {
            tracing::info!(registry_url = %url, "gateway using remote registry");
            Arc::new(RemoteRegistry::new(url, cfg.service_timeout())?)
        }
        None => Arc::new(open_registry(cfg).await?),
    };
    let dispatcher = HttpDispatcher::new(cfg.dispatch_config())?;
    Ok(Arc::new(Gateway::new(resolver, dispatcher)))
}
