use crate::{
    error::RegistryResult,
    registry::{Registry, Resolution},
};
use async_trait::async_trait;

/// What the gateway needs from a registry: slug resolution.
#[async_trait]
pub trait ToolResolver: Send + Sync {
    async fn resolve(&self, slug: &str) -> RegistryResult<Resolution>;
}

#[async_trait]
impl ToolResolver for Registry {
    async fn resolve(&self, slug: &str) -> RegistryResult<Resolution> {
        Registry::resolve(self, slug).await
    }
}
