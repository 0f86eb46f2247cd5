//! Service configuration, optionally loaded from YAML

use crate::error::{ServerError, ServerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use toolevo_gateway::DispatchConfig;

/// Which service(s) a process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    All,
    Registry,
    Gateway,
    Orchestrator,
}

impl ServiceRole {
    pub fn serves_registry(self) -> bool {
        matches!(self, ServiceRole::All | ServiceRole::Registry)
    }

    pub fn serves_gateway(self) -> bool {
        matches!(self, ServiceRole::All | ServiceRole::Gateway)
    }

    pub fn serves_orchestrator(self) -> bool {
        matches!(self, ServiceRole::All | ServiceRole::Orchestrator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub registry_addr: String,
    pub gateway_addr: String,
    pub orchestrator_addr: String,
    /// Remote registry used by a standalone gateway
    pub registry_url: Option<String>,
    /// Remote gateway used by a standalone orchestrator
    pub gateway_url: Option<String>,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/toolevo.db".to_string(),
            max_connections: 10,
            registry_addr: "127.0.0.1:8001".to_string(),
            gateway_addr: "127.0.0.1:8003".to_string(),
            orchestrator_addr: "127.0.0.1:8004".to_string(),
            registry_url: None,
            gateway_url: None,
            request_timeout_ms: 10_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl ServerConfig {
    pub fn from_yaml_str(content: &str) -> ServerResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn from_yaml_file(path: &Path) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            connect_timeout_ms: self.connect_timeout_ms,
            request_timeout_ms: self.request_timeout_ms,
        }
    }

    /// Timeout for calls to another toolevo service: long enough for that
    /// service to hit its own backend timeout first.
    pub fn service_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms + self.connect_timeout_ms + 2_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_overrides_only_given_keys() {
        let cfg = ServerConfig::from_yaml_str(
            "database_url: \"sqlite::memory:\"\nrequest_timeout_ms: 2500\ngateway_url: http://gw:8003\n",
        )
        .unwrap();
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.request_timeout_ms, 2500);
        assert_eq!(cfg.gateway_url.as_deref(), Some("http://gw:8003"));
        assert_eq!(cfg.connect_timeout_ms, 3_000);
        assert_eq!(cfg.registry_addr, "127.0.0.1:8001");
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let err = ServerConfig::from_yaml_str("max_connections: [1, 2]").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn test_roles() {
        assert!(ServiceRole::All.serves_registry());
        assert!(ServiceRole::All.serves_orchestrator());
        assert!(!ServiceRole::Gateway.serves_registry());
        assert!(ServiceRole::Gateway.serves_gateway());
    }
}
