//! Orchestrator: the external entry point, wrapping gateway results in an envelope

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use toolevo_core::{ErrorKind, ToolRef, VersionRef};
use toolevo_gateway::{GatewayError, GatewayResult, ToolExecutor, Warning};

/// Envelope returned by `POST /execute`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OrchestratorResponse {
    Ok {
        tool: ToolRef,
        version: VersionRef,
        result: JsonValue,
        upstream_status: u16,
        warnings: Vec<Warning>,
    },
    Error {
        error_kind: ErrorKind,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<JsonValue>,
    },
}

impl OrchestratorResponse {
    pub fn status_code(&self) -> u16 {
        match self {
            OrchestratorResponse::Ok { .. } => 200,
            OrchestratorResponse::Error { error_kind, .. } => error_kind.status_code(),
        }
    }
}

impl From<GatewayResult> for OrchestratorResponse {
    fn from(r: GatewayResult) -> Self {
        OrchestratorResponse::Ok {
            tool: r.tool,
            version: r.version,
            result: r.body,
            upstream_status: r.upstream_status,
            warnings: r.warnings,
        }
    }
}

impl From<GatewayError> for OrchestratorResponse {
    fn from(e: GatewayError) -> Self {
        OrchestratorResponse::Error {
            error_kind: e.kind(),
            message: e.to_string(),
            details: e.details(),
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    executor: Arc<dyn ToolExecutor>,
}

impl Orchestrator {
    pub fn new(executor: Arc<dyn ToolExecutor>) -> Self {
        Self { executor }
    }

    /// Run a tool and normalize the outcome. Every gateway failure surfaces
    /// as an error envelope carrying its kind.
    pub async fn execute(&self, slug: &str, input: &JsonValue) -> OrchestratorResponse {
        match self.executor.execute(slug, input).await {
            Ok(result) => {
                tracing::info!(
                    slug,
                    version = %result.version.version,
                    upstream_status = result.upstream_status,
                    "execute succeeded"
                );
                result.into()
            }
            Err(err) => {
                tracing::warn!(slug, error_kind = %err.kind(), error = %err, "execute failed");
                err.into()
            }
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use toolevo_gateway::CallResult;
    use toolevo_registry::RegistryError;

    struct Fixed(fn() -> CallResult<GatewayResult>);

    #[async_trait]
    impl ToolExecutor for Fixed {
        async fn execute(&self, _slug: &str, _input: &JsonValue) -> CallResult<GatewayResult> {
            (self.0)()
        }
    }

    fn ok_result() -> CallResult<GatewayResult> {
        Ok(GatewayResult {
            tool: ToolRef { id: "t1".into(), slug: "weather".into() },
            version: VersionRef { id: "v1".into(), version: "1.0.0".into() },
            upstream_status: 200,
            body: json!({"temperatureC": 21.5}),
            success: true,
            warnings: vec![],
            duration_ms: 3,
        })
    }

    fn not_found() -> CallResult<GatewayResult> {
        Err(RegistryError::ToolNotFound("ghost".into()).into())
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let orchestrator = Orchestrator::new(Arc::new(Fixed(ok_result)));
        let response = orchestrator.execute("weather", &json!({})).await;
        assert_eq!(response.status_code(), 200);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["result"]["temperatureC"], 21.5);
        assert_eq!(value["tool"]["slug"], "weather");
        assert_eq!(value["version"]["version"], "1.0.0");
        assert_eq!(value["upstream_status"], 200);
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let orchestrator = Orchestrator::new(Arc::new(Fixed(not_found)));
        let response = orchestrator.execute("ghost", &json!({})).await;
        assert_eq!(response.status_code(), 404);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error_kind"], "ToolNotFound");
        assert!(value.get("details").is_none());
    }
}
