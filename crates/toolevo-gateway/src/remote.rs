//! HTTP client for a gateway running as its own service

use crate::error::{CallResult, GatewayError};
use crate::executor::ToolExecutor;
use crate::gateway::{CallRequest, GatewayResult};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::time::Duration;
use toolevo_core::{current_request_id, ErrorBody, REQUEST_ID_HEADER};

/// Runs tools through `POST {base_url}/call`
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    client: reqwest::Client,
    call_url: url::Url,
}

impl RemoteGateway {
    /// `timeout` should exceed the gateway's own request timeout so upstream
    /// timeouts are reported by the gateway rather than by this client.
    pub fn new(base_url: &str, timeout: Duration) -> CallResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::InvalidConfig(format!("failed to build client: {}", e)))?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> CallResult<Self> {
        let call_url = url::Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .and_then(|base| base.join("call"))
            .map_err(|e| GatewayError::InvalidConfig(format!("gateway url '{}': {}", base_url, e)))?;
        Ok(Self { client, call_url })
    }
}

#[async_trait]
impl ToolExecutor for RemoteGateway {
    async fn execute(&self, slug: &str, input: &JsonValue) -> CallResult<GatewayResult> {
        let request = CallRequest { slug: slug.to_string(), input: input.clone() };
        let mut builder = self.client.post(self.call_url.clone()).json(&request);
        if let Some(id) = current_request_id() {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        let resp = builder
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_slice::<GatewayResult>(&bytes)
                .map_err(|e| GatewayError::Unavailable(format!("malformed call response: {}", e)));
        }

        match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => Err(GatewayError::from_wire(body)),
            Err(_) => Err(GatewayError::Unavailable(format!(
                "gateway answered {}: {}",
                status,
                String::from_utf8_lossy(&bytes)
            ))),
        }
    }
}
