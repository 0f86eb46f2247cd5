pub mod auth;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod remote;

// Re-export commonly used types
pub use dispatcher::{DispatchConfig, HttpDispatcher, UpstreamResponse};
pub use error::{CallResult, GatewayError};
pub use executor::ToolExecutor;
pub use gateway::{CallRequest, Gateway, GatewayResult, Warning, WarningKind};
pub use remote::RemoteGateway;
