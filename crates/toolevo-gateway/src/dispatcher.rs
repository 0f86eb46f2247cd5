//! Outbound HTTP dispatch with bounded timeouts

use crate::auth::apply_auth;
use crate::error::{CallResult, GatewayError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use toolevo_core::{EndpointDescriptor, HttpMethod};

/// Timeouts applied to every backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Time allowed to establish a connection
    pub connect_timeout_ms: u64,
    /// Total time allowed for one call, connection included
    pub request_timeout_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { connect_timeout_ms: 3_000, request_timeout_ms: 10_000 }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> CallResult<()> {
        if self.connect_timeout_ms == 0 || self.request_timeout_ms == 0 {
            return Err(GatewayError::InvalidConfig("timeouts must be greater than 0".to_string()));
        }
        if self.connect_timeout_ms > self.request_timeout_ms {
            return Err(GatewayError::InvalidConfig(
                "connect timeout cannot be greater than request timeout".to_string(),
            ));
        }
        Ok(())
    }
}

/// What came back from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: JsonValue,
    pub elapsed_ms: u64,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends calls to tool backends through one shared client
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    config: DispatchConfig,
}

impl HttpDispatcher {
    pub fn new(config: DispatchConfig) -> CallResult<Self> {
        config.validate()?;
        // Only the connect timeout lives on the client; the request timeout is per call.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| GatewayError::InvalidConfig(format!("failed to build client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Send `input` to the endpoint. Any status code is a response; only
    /// transport failures and timeouts are errors.
    pub async fn dispatch(
        &self,
        descriptor: &EndpointDescriptor,
        input: &JsonValue,
    ) -> CallResult<UpstreamResponse> {
        let started = Instant::now();
        let method = to_reqwest_method(descriptor.method);

        let mut builder = self.client.request(method, &descriptor.url);
        builder = if descriptor.method.sends_body() {
            builder.json(input)
        } else {
            builder.query(&input_to_query(input))
        };
        builder = apply_auth(builder, descriptor.auth_type, &descriptor.auth_config);

        let request_timeout = Duration::from_millis(self.config.request_timeout_ms);
        let response = self.execute_with_timeout(request_timeout, builder.send()).await?;
        let status = response.status().as_u16();
        let text = self
            .execute_with_timeout(request_timeout.saturating_sub(started.elapsed()), response.text())
            .await?;

        Ok(UpstreamResponse {
            status,
            body: decode_body(text),
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn execute_with_timeout<F, T>(&self, limit: Duration, operation: F) -> CallResult<T>
    where
        F: std::future::Future<Output = Result<T, reqwest::Error>>,
    {
        match timeout(limit, operation).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) if err.is_builder() => {
                Err(GatewayError::Internal(format!("invalid outbound request: {}", err)))
            }
            Ok(Err(err)) if err.is_timeout() => Err(GatewayError::UpstreamUnavailable(format!(
                "request timed out after {}ms",
                self.config.request_timeout_ms
            ))),
            Ok(Err(err)) if err.is_connect() => {
                Err(GatewayError::UpstreamUnavailable(format!("connection failed: {}", err)))
            }
            Ok(Err(err)) => Err(GatewayError::UpstreamUnavailable(err.to_string())),
            Err(_) => Err(GatewayError::UpstreamUnavailable(format!(
                "request timed out after {}ms",
                self.config.request_timeout_ms
            ))),
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Top-level input fields as query parameters. Nulls are skipped, strings
/// are sent as-is, other scalars in their JSON form, nested values as
/// compact JSON.
pub fn input_to_query(input: &JsonValue) -> Vec<(String, String)> {
    let Some(obj) = input.as_object() else {
        return Vec::new();
    };
    obj.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let rendered = match v {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), rendered)
        })
        .collect()
}

/// Empty body is `null`, JSON is parsed, anything else is wrapped as `{"raw": text}`.
pub fn decode_body(text: String) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(&text).unwrap_or_else(|_| json!({ "raw": text }))
}
