pub mod error;
pub mod registry;
pub mod remote;
pub mod resolver;
pub mod validation;

// Re-export commonly used types
pub use error::{RegistryError, RegistryResult};
pub use registry::{Registry, Resolution};
pub use remote::RemoteRegistry;
pub use resolver::ToolResolver;
