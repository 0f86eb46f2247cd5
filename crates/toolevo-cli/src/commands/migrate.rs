//! Database migration command

use crate::{error::CliResult, utils::ColoredOutput};
use toolevo_server::{app_state::open_registry, ServerConfig};
use tracing::info;

pub struct MigrateCommand;

impl MigrateCommand {
    pub async fn run(cfg: &ServerConfig) -> CliResult<()> {
        info!("Initializing database at: {}", cfg.database_url);

        let registry = open_registry(cfg).await?;
        let tools = registry.list_tools(None).await?;

        println!("{}", ColoredOutput::success("✓ Database initialized successfully"));
        println!("Database: {}", ColoredOutput::highlight(&cfg.database_url));
        println!("Tools: {}", tools.len());

        Ok(())
    }
}
