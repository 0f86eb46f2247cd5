//! Error types for the CLI

use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Server(#[from] toolevo_server::ServerError),

    #[error("Registry error: {0}")]
    Registry(#[from] toolevo_registry::RegistryError),

    #[error("Store error: {0}")]
    Store(#[from] toolevo_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("{0}")]
    General(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::General(format!("{:#}", err))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
