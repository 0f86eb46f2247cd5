use crate::error::CallResult;
use crate::gateway::{Gateway, GatewayResult};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// What the orchestrator needs from a gateway: run a tool by slug.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, slug: &str, input: &JsonValue) -> CallResult<GatewayResult>;
}

#[async_trait]
impl ToolExecutor for Gateway {
    async fn execute(&self, slug: &str, input: &JsonValue) -> CallResult<GatewayResult> {
        Gateway::execute(self, slug, input).await
    }
}
