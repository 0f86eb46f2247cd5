//! Gateway: resolve, validate input, dispatch, validate output

use crate::dispatcher::HttpDispatcher;
use crate::error::{CallResult, GatewayError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;
use toolevo_core::{
    redact_auth_config, sanitize_json_value, SchemaNode, SchemaViolation, ToolRef, VersionRef,
};
use toolevo_registry::ToolResolver;

/// Non-fatal findings attached to a successful call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    OutputValidationWarning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub path: String,
    pub message: String,
}

impl From<SchemaViolation> for Warning {
    fn from(v: SchemaViolation) -> Self {
        Self { kind: WarningKind::OutputValidationWarning, path: v.path, message: v.message }
    }
}

/// Result of one successful tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResult {
    pub tool: ToolRef,
    pub version: VersionRef,
    pub upstream_status: u16,
    pub body: JsonValue,
    pub success: bool,
    #[serde(default)]
    pub warnings: Vec<Warning>,
    pub duration_ms: u64,
}

/// Request body of `POST /call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    pub slug: String,
    #[serde(default)]
    pub input: JsonValue,
}

#[derive(Clone)]
pub struct Gateway {
    resolver: Arc<dyn ToolResolver>,
    dispatcher: HttpDispatcher,
}

impl Gateway {
    pub fn new(resolver: Arc<dyn ToolResolver>, dispatcher: HttpDispatcher) -> Self {
        Self { resolver, dispatcher }
    }

    pub async fn execute(&self, slug: &str, input: &JsonValue) -> CallResult<GatewayResult> {
        let started = Instant::now();
        let resolution = self.resolver.resolve(slug).await?;
        let (tool, version) = (resolution.tool, resolution.version);

        let input_schema = SchemaNode::parse(&version.input_schema).map_err(|e| {
            GatewayError::Internal(format!("stored input_schema of '{}' is invalid: {}", slug, e))
        })?;
        if let Err(violations) = input_schema.validate(input) {
            tracing::info!(
                slug,
                version = %version.version,
                violations = violations.len(),
                input = %sanitize_json_value(input),
                "input rejected by schema"
            );
            return Err(GatewayError::InputValidation(violations));
        }

        let descriptor = version.descriptor();
        tracing::debug!(
            slug,
            version = %version.version,
            method = %descriptor.method,
            url = %descriptor.url,
            auth = %descriptor.auth_type,
            auth_config = %redact_auth_config(&descriptor.auth_config),
            "dispatching"
        );

        let response = match self.dispatcher.dispatch(&descriptor, input).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(slug, url = %descriptor.url, error = %err, "upstream call failed");
                return Err(err);
            }
        };

        if !response.is_success() {
            tracing::warn!(
                slug,
                version = %version.version,
                upstream_status = response.status,
                elapsed_ms = response.elapsed_ms,
                "upstream returned an error status"
            );
            return Err(GatewayError::Upstream { status: response.status, body: response.body });
        }

        let warnings = output_warnings(&version.output_schema, &response.body);
        for warning in &warnings {
            tracing::warn!(slug, path = %warning.path, message = %warning.message, "output does not match schema");
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            slug,
            version = %version.version,
            method = %descriptor.method,
            url = %descriptor.url,
            upstream_status = response.status,
            warnings = warnings.len(),
            duration_ms,
            "tool call completed"
        );

        Ok(GatewayResult {
            tool: tool.identity(),
            version: version.identity(),
            upstream_status: response.status,
            body: response.body,
            success: true,
            warnings,
            duration_ms,
        })
    }
}

fn output_warnings(output_schema: &JsonValue, body: &JsonValue) -> Vec<Warning> {
    match SchemaNode::parse(output_schema) {
        Ok(schema) => match schema.validate(body) {
            Ok(()) => Vec::new(),
            Err(violations) => violations.into_iter().map(Warning::from).collect(),
        },
        Err(e) => vec![Warning {
            kind: WarningKind::OutputValidationWarning,
            path: e.path,
            message: format!("output_schema could not be parsed: {}", e.reason),
        }],
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").field("dispatcher", &self.dispatcher).finish_non_exhaustive()
    }
}
