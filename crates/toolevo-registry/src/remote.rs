//! HTTP client for a registry running as its own service

use crate::{
    error::{RegistryError, RegistryResult},
    registry::Resolution,
    resolver::ToolResolver,
};
use async_trait::async_trait;
use std::time::Duration;
use toolevo_core::{current_request_id, ErrorBody, REQUEST_ID_HEADER};

/// Resolves slugs through `GET {base_url}/resolve?slug=...`
#[derive(Debug, Clone)]
pub struct RemoteRegistry {
    client: reqwest::Client,
    base_url: url::Url,
}

impl RemoteRegistry {
    pub fn new(base_url: &str, timeout: Duration) -> RegistryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Unavailable(format!("failed to build client: {}", e)))?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> RegistryResult<Self> {
        // Trailing slash so `join` appends to any base path instead of replacing it.
        let base_url = url::Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| RegistryError::InvalidInput(format!("registry url '{}': {}", base_url, e)))?;
        Ok(Self { client, base_url })
    }

    fn resolve_url(&self, slug: &str) -> RegistryResult<url::Url> {
        let mut url = self
            .base_url
            .join("resolve")
            .map_err(|e| RegistryError::InvalidInput(e.to_string()))?;
        url.query_pairs_mut().append_pair("slug", slug);
        Ok(url)
    }
}

#[async_trait]
impl ToolResolver for RemoteRegistry {
    async fn resolve(&self, slug: &str) -> RegistryResult<Resolution> {
        let url = self.resolve_url(slug)?;
        let mut request = self.client.get(url);
        if let Some(id) = current_request_id() {
            request = request.header(REQUEST_ID_HEADER, id);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_slice::<Resolution>(&bytes).map_err(|e| {
                RegistryError::Unavailable(format!("malformed resolve response: {}", e))
            });
        }

        match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => Err(RegistryError::from_wire(body)),
            Err(_) => Err(RegistryError::Unavailable(format!(
                "registry answered {}: {}",
                status,
                String::from_utf8_lossy(&bytes)
            ))),
        }
    }
}
