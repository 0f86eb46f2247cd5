//! Error taxonomy shared by every service and by the remote clients.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Machine-readable error kind carried in every error body as `error_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ToolNotFound,
    VersionNotFound,
    NoActiveVersion,
    DuplicateSlug,
    DuplicateVersion,
    InvalidStatusTransition,
    InputValidationError,
    InvalidSchema,
    InvalidDescriptor,
    InvalidInput,
    UpstreamError,
    UpstreamUnavailable,
    RegistryUnavailable,
    GatewayUnavailable,
    #[serde(other)]
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ToolNotFound => "ToolNotFound",
            ErrorKind::VersionNotFound => "VersionNotFound",
            ErrorKind::NoActiveVersion => "NoActiveVersion",
            ErrorKind::DuplicateSlug => "DuplicateSlug",
            ErrorKind::DuplicateVersion => "DuplicateVersion",
            ErrorKind::InvalidStatusTransition => "InvalidStatusTransition",
            ErrorKind::InputValidationError => "InputValidationError",
            ErrorKind::InvalidSchema => "InvalidSchema",
            ErrorKind::InvalidDescriptor => "InvalidDescriptor",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::UpstreamError => "UpstreamError",
            ErrorKind::UpstreamUnavailable => "UpstreamUnavailable",
            ErrorKind::RegistryUnavailable => "RegistryUnavailable",
            ErrorKind::GatewayUnavailable => "GatewayUnavailable",
            ErrorKind::Internal => "Internal",
        }
    }

    /// HTTP status every service answers with for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::ToolNotFound | ErrorKind::VersionNotFound => 404,
            ErrorKind::NoActiveVersion
            | ErrorKind::DuplicateSlug
            | ErrorKind::DuplicateVersion
            | ErrorKind::InvalidStatusTransition => 409,
            ErrorKind::InputValidationError
            | ErrorKind::InvalidSchema
            | ErrorKind::InvalidDescriptor
            | ErrorKind::InvalidInput => 422,
            ErrorKind::UpstreamError => 502,
            ErrorKind::UpstreamUnavailable => 504,
            ErrorKind::RegistryUnavailable | ErrorKind::GatewayUnavailable => 503,
            ErrorKind::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{"status":"error","error_kind":..,"message":..,"details":..}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub error_kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl ErrorBody {
    pub fn new(error_kind: ErrorKind, message: impl Into<String>, details: Option<JsonValue>) -> Self {
        Self { status: "error".to_string(), error_kind, message: message.into(), details }
    }
}
