pub mod auth;
pub mod descriptor;
pub mod error;
pub mod request_context;
pub mod resolve;
pub mod sanitization;
pub mod schema;
pub mod store;
pub mod types;
pub mod wire;

// Re-export commonly used types
pub use auth::{AuthScheme, AuthType, AUTH_SCHEMES};
pub use descriptor::{DescriptorError, EndpointDescriptor, HttpMethod, Protocol};
pub use error::{CoreError, CoreResult};
pub use request_context::{current_request_id, with_request_id, REQUEST_ID_HEADER};
pub use resolve::select_active_version;
pub use sanitization::{is_sensitive_field, redact_auth_config, sanitize_json_value};
pub use schema::{SchemaError, SchemaNode, SchemaViolation};
pub use store::{ToolListFilter, ToolStore};
pub use types::{
    NewTool, NewToolVersion, Tool, ToolRef, ToolVersion, ToolWithVersions, VersionRef,
    VersionStatus,
};
pub use wire::{ErrorBody, ErrorKind};
