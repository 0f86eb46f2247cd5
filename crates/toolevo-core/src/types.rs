use crate::auth::AuthType;
use crate::descriptor::{EndpointDescriptor, HttpMethod, Protocol};
use crate::sanitization::redact_auth_config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a tool version.
///
/// Transitions only move forward: `draft -> active -> deprecated`
/// (skipping `active` is allowed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    #[default]
    Draft,
    Active,
    Deprecated,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::Draft => "draft",
            VersionStatus::Active => "active",
            VersionStatus::Deprecated => "deprecated",
        }
    }

    fn rank(self) -> u8 {
        match self {
            VersionStatus::Draft => 0,
            VersionStatus::Active => 1,
            VersionStatus::Deprecated => 2,
        }
    }

    /// Whether moving from `self` to `next` respects the monotonic lifecycle.
    /// Re-applying the current status is accepted as a no-op.
    pub fn can_transition_to(self, next: VersionStatus) -> bool {
        next.rank() >= self.rank()
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(VersionStatus::Draft),
            "active" => Ok(VersionStatus::Active),
            "deprecated" => Ok(VersionStatus::Deprecated),
            other => Err(format!("unknown version status: {}", other)),
        }
    }
}

/// A named capability identified by a globally unique slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub slug: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tool {
    pub fn identity(&self) -> ToolRef {
        ToolRef { id: self.id.clone(), slug: self.slug.clone() }
    }
}

/// One schema-and-endpoint-bound revision of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolVersion {
    pub id: String,
    pub tool_id: String,
    /// Store-assigned insertion sequence; higher means inserted later.
    #[serde(default)]
    pub seq: i64,
    pub version: String,
    pub status: VersionStatus,
    pub input_schema: JsonValue,
    pub output_schema: JsonValue,
    pub endpoint_protocol: Protocol,
    pub endpoint_method: HttpMethod,
    pub endpoint_url: String,
    pub auth_type: AuthType,
    #[serde(default)]
    pub auth_config: JsonValue,
    /// Advertised price per call, a decimal string such as `"0.0025"`
    #[serde(default)]
    pub cost_per_call_usd: Option<String>,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ToolVersion {
    pub fn identity(&self) -> VersionRef {
        VersionRef { id: self.id.clone(), version: self.version.clone() }
    }

    /// Copy safe to show to operators: `auth_config` secrets are masked.
    pub fn redacted(mut self) -> Self {
        self.auth_config = redact_auth_config(&self.auth_config);
        self
    }

    pub fn descriptor(&self) -> EndpointDescriptor {
        EndpointDescriptor {
            protocol: self.endpoint_protocol,
            method: self.endpoint_method,
            url: self.endpoint_url.clone(),
            auth_type: self.auth_type,
            auth_config: self.auth_config.clone(),
        }
    }
}

/// A tool together with all of its versions in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolWithVersions {
    #[serde(flatten)]
    pub tool: Tool,
    #[serde(default)]
    pub versions: Vec<ToolVersion>,
}

/// Identity of a resolved tool, as reported in execution results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRef {
    pub id: String,
    pub slug: String,
}

/// Identity of a resolved version, as reported in execution results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRef {
    pub id: String,
    pub version: String,
}

/// Registration payload for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTool {
    pub slug: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Registration payload for a tool version. Descriptor fields arrive as raw
/// strings and are validated into typed values by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewToolVersion {
    pub version: String,
    #[serde(default)]
    pub status: Option<VersionStatus>,
    pub input_schema: JsonValue,
    pub output_schema: JsonValue,
    pub endpoint_protocol: String,
    #[serde(default)]
    pub endpoint_method: Option<String>,
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub auth_type: Option<String>,
    #[serde(default)]
    pub auth_config: Option<JsonValue>,
    #[serde(default)]
    pub cost_per_call_usd: Option<String>,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transitions_are_monotonic() {
        use VersionStatus::*;
        assert!(Draft.can_transition_to(Active));
        assert!(Draft.can_transition_to(Deprecated));
        assert!(Active.can_transition_to(Deprecated));
        assert!(Active.can_transition_to(Active));
        assert!(!Active.can_transition_to(Draft));
        assert!(!Deprecated.can_transition_to(Active));
        assert!(!Deprecated.can_transition_to(Draft));
    }

    #[test]
    fn redacted_masks_credentials_only() {
        let now = Utc::now();
        let version = ToolVersion {
            id: "v1".into(),
            tool_id: "t1".into(),
            seq: 1,
            version: "1.0.0".into(),
            status: VersionStatus::Active,
            input_schema: serde_json::json!({}),
            output_schema: serde_json::json!({}),
            endpoint_protocol: Protocol::Http,
            endpoint_method: HttpMethod::Post,
            endpoint_url: "http://localhost:9000/weather".into(),
            auth_type: AuthType::Basic,
            auth_config: serde_json::json!({"username": "svc", "password": "pw"}),
            cost_per_call_usd: Some("0.01".into()),
            valid_from: None,
            valid_to: None,
            created_at: now,
            updated_at: now,
        };
        let shown = version.clone().redacted();
        assert_eq!(shown.auth_config["username"], "svc");
        assert_ne!(shown.auth_config["password"], "pw");
        assert_eq!(shown.endpoint_url, version.endpoint_url);
        assert_eq!(shown.cost_per_call_usd, version.cost_per_call_usd);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("ACTIVE".parse::<VersionStatus>().unwrap(), VersionStatus::Active);
        assert!("retired".parse::<VersionStatus>().is_err());
    }

    #[test]
    fn new_version_defaults_optional_fields() {
        let payload: NewToolVersion = serde_json::from_value(serde_json::json!({
            "version": "1.0.0",
            "input_schema": {"type": "object"},
            "output_schema": {},
            "endpoint_protocol": "http",
            "endpoint_url": "localhost:9000/weather"
        }))
        .unwrap();
        assert!(payload.status.is_none());
        assert!(payload.endpoint_method.is_none());
        assert!(payload.auth_type.is_none());
        assert!(payload.cost_per_call_usd.is_none());
        assert!(payload.valid_from.is_none() && payload.valid_to.is_none());
    }

    #[test]
    fn new_version_reads_pricing_window() {
        let payload: NewToolVersion = serde_json::from_value(serde_json::json!({
            "version": "1.0.0",
            "input_schema": {},
            "output_schema": {},
            "endpoint_protocol": "http",
            "cost_per_call_usd": "0.0025",
            "valid_from": "2026-01-01T00:00:00Z",
            "valid_to": "2026-12-31T23:59:59Z"
        }))
        .unwrap();
        assert_eq!(payload.cost_per_call_usd.as_deref(), Some("0.0025"));
        assert!(payload.valid_from < payload.valid_to);
    }
}
