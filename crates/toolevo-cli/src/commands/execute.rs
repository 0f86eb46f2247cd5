//! Tool execution command

use crate::{
    cli::OutputFormat,
    error::{CliError, CliResult},
    utils::{read_input_data, ColoredOutput},
};
use toolevo_server::{AppState, OrchestratorResponse, ServerConfig, ServiceRole};
use tracing::info;

pub struct ExecuteCommand;

impl ExecuteCommand {
    /// Run `slug` in-process and print the envelope. An error envelope is
    /// printed too, then reported as a failed command.
    pub async fn run(
        cfg: &ServerConfig,
        slug: &str,
        input: Option<String>,
        input_file: Option<String>,
        format: OutputFormat,
    ) -> CliResult<OrchestratorResponse> {
        let input = read_input_data(input, input_file)?;
        info!("Executing tool: {}", slug);

        let state = AppState::from_config(cfg, ServiceRole::All).await?;
        let response = state.orchestrator()?.execute(slug, &input).await;

        let value = serde_json::to_value(&response)?;
        println!("{}", format.format_json(&value)?);

        if let OrchestratorResponse::Ok { warnings, .. } = &response {
            for warning in warnings {
                eprintln!(
                    "{} {}: {}",
                    ColoredOutput::warning("warning:"),
                    warning.path,
                    warning.message
                );
            }
        }

        match &response {
            OrchestratorResponse::Ok { .. } => Ok(response),
            OrchestratorResponse::Error { error_kind, message, .. } => {
                Err(CliError::ExecutionFailed(format!("{}: {}", error_kind, message)))
            }
        }
    }
}
