//! Error types for the registry

use toolevo_core::{CoreError, ErrorBody, ErrorKind, VersionStatus};
use thiserror::Error;

/// Registry-specific errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Version '{version_id}' not found for tool '{tool_id}'")]
    VersionNotFound { tool_id: String, version_id: String },

    #[error("Tool '{0}' has no active version")]
    NoActiveVersion(String),

    #[error("Slug '{0}' is already registered")]
    DuplicateSlug(String),

    #[error("Version '{version}' already exists for tool '{tool_id}'")]
    DuplicateVersion { tool_id: String, version: String },

    #[error("Cannot move version from '{from}' to '{to}'")]
    InvalidStatusTransition { from: VersionStatus, to: VersionStatus },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid endpoint descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid input data: {0}")]
    InvalidInput(String),

    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation failed: {0}")]
    Store(String),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::ToolNotFound(_) => ErrorKind::ToolNotFound,
            RegistryError::VersionNotFound { .. } => ErrorKind::VersionNotFound,
            RegistryError::NoActiveVersion(_) => ErrorKind::NoActiveVersion,
            RegistryError::DuplicateSlug(_) => ErrorKind::DuplicateSlug,
            RegistryError::DuplicateVersion { .. } => ErrorKind::DuplicateVersion,
            RegistryError::InvalidStatusTransition { .. } => ErrorKind::InvalidStatusTransition,
            RegistryError::InvalidSchema(_) => ErrorKind::InvalidSchema,
            RegistryError::InvalidDescriptor(_) => ErrorKind::InvalidDescriptor,
            RegistryError::InvalidInput(_) => ErrorKind::InvalidInput,
            RegistryError::Unavailable(_) => ErrorKind::RegistryUnavailable,
            RegistryError::Store(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Rebuild a typed error from an error body returned by a registry service.
    ///
    /// Structured fields that do not travel on the wire are filled with the
    /// message so the kind, and therefore the HTTP status, is preserved.
    pub fn from_wire(body: ErrorBody) -> Self {
        let message = body.message;
        match body.error_kind {
            ErrorKind::ToolNotFound => RegistryError::ToolNotFound(message),
            ErrorKind::VersionNotFound => {
                RegistryError::VersionNotFound { tool_id: String::new(), version_id: message }
            }
            ErrorKind::NoActiveVersion => RegistryError::NoActiveVersion(message),
            ErrorKind::DuplicateSlug => RegistryError::DuplicateSlug(message),
            ErrorKind::DuplicateVersion => {
                RegistryError::DuplicateVersion { tool_id: String::new(), version: message }
            }
            ErrorKind::InvalidSchema => RegistryError::InvalidSchema(message),
            ErrorKind::InvalidDescriptor => RegistryError::InvalidDescriptor(message),
            ErrorKind::InvalidInput => RegistryError::InvalidInput(message),
            ErrorKind::RegistryUnavailable => RegistryError::Unavailable(message),
            _ => RegistryError::Store(message),
        }
    }
}

impl From<CoreError> for RegistryError {
    fn from(err: CoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Registry result type
pub type RegistryResult<T> = Result<T, RegistryError>;
