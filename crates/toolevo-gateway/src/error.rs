//! Error types for gateway execution

use serde_json::{json, Value as JsonValue};
use thiserror::Error;
use toolevo_core::{ErrorBody, ErrorKind, SchemaViolation};
use toolevo_registry::RegistryError;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Resolution failures pass through with their original kind
    #[error(transparent)]
    Resolution(#[from] RegistryError),

    #[error("Input does not match the tool's input schema ({} violation(s))", .0.len())]
    InputValidation(Vec<SchemaViolation>),

    #[error("Upstream returned status {status}")]
    Upstream { status: u16, body: JsonValue },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Resolution(e) => e.kind(),
            GatewayError::InputValidation(_) => ErrorKind::InputValidationError,
            GatewayError::Upstream { .. } => ErrorKind::UpstreamError,
            GatewayError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            GatewayError::Unavailable(_) => ErrorKind::GatewayUnavailable,
            GatewayError::InvalidConfig(_) | GatewayError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Structured payload for the `details` field of an error body
    pub fn details(&self) -> Option<JsonValue> {
        match self {
            GatewayError::InputValidation(violations) => {
                Some(json!({ "violations": violations }))
            }
            GatewayError::Upstream { status, body } => {
                Some(json!({ "upstream_status": status, "body": body }))
            }
            _ => None,
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody::new(self.kind(), self.to_string(), self.details())
    }

    /// Rebuild a typed error from an error body returned by a gateway service.
    pub fn from_wire(body: ErrorBody) -> Self {
        match body.error_kind {
            ErrorKind::InputValidationError => {
                let violations = body
                    .details
                    .as_ref()
                    .and_then(|d| d.get("violations"))
                    .and_then(|v| serde_json::from_value(v.clone()).ok())
                    .unwrap_or_default();
                GatewayError::InputValidation(violations)
            }
            ErrorKind::UpstreamError => {
                let details = body.details.unwrap_or(JsonValue::Null);
                GatewayError::Upstream {
                    status: details
                        .get("upstream_status")
                        .and_then(JsonValue::as_u64)
                        .and_then(|s| u16::try_from(s).ok())
                        .unwrap_or(0),
                    body: details.get("body").cloned().unwrap_or(JsonValue::Null),
                }
            }
            ErrorKind::UpstreamUnavailable => GatewayError::UpstreamUnavailable(body.message),
            ErrorKind::GatewayUnavailable => GatewayError::Unavailable(body.message),
            ErrorKind::Internal => GatewayError::Internal(body.message),
            _ => GatewayError::Resolution(RegistryError::from_wire(body)),
        }
    }
}

pub type CallResult<T> = Result<T, GatewayError>;
