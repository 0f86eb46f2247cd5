pub mod execute;
pub mod list;
pub mod migrate;
pub mod serve;

// Re-export command handlers
pub use execute::ExecuteCommand;
pub use list::ListCommand;
pub use migrate::MigrateCommand;
pub use serve::ServeCommand;
