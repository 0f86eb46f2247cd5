//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use toolevo_core::{ErrorBody, ErrorKind};
use toolevo_gateway::GatewayError;
use toolevo_registry::RegistryError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error enum
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::Registry(e) => e.kind(),
            ServerError::Gateway(e) => e.kind(),
            ServerError::InvalidInput(_) => ErrorKind::InvalidInput,
            ServerError::Config(_) | ServerError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        match self {
            ServerError::Gateway(e) => e.to_error_body(),
            other => ErrorBody::new(other.kind(), other.to_string(), None),
        }
    }

    pub fn to_http_response(&self) -> (StatusCode, Json<ErrorBody>) {
        let status = StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_error_body()))
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.kind() == ErrorKind::Internal {
            tracing::error!(error = %self, "request failed");
        }
        self.to_http_response().into_response()
    }
}

impl From<toolevo_store::StoreError> for ServerError {
    fn from(err: toolevo_store::StoreError) -> Self {
        ServerError::Internal(format!("store: {}", err))
    }
}
