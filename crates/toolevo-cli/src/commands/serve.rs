//! Serve command: run one service or all of them

use crate::{cli::ServeRole, error::CliResult};
use toolevo_server::{AppState, ServerConfig, ServiceRole};
use tracing::info;

pub struct ServeCommand;

impl ServeCommand {
    pub async fn run(cfg: &ServerConfig, role: ServeRole) -> CliResult<()> {
        let role = ServiceRole::from(role);
        info!(?role, "starting services");
        let state = AppState::from_config(cfg, role).await?;
        toolevo_server::serve(state, cfg, role).await?;
        Ok(())
    }
}
