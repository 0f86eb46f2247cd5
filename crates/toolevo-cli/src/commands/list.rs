//! List command for tools and versions

use crate::{
    cli::{ListResource, OutputFormat},
    error::{CliError, CliResult},
    utils::{truncate_text, ColoredOutput},
};
use toolevo_core::{Tool, ToolVersion, VersionStatus};
use toolevo_server::{app_state::open_registry, ServerConfig};
use tracing::debug;

pub struct ListCommand;

impl ListCommand {
    pub async fn run(cfg: &ServerConfig, resource: ListResource) -> CliResult<()> {
        let registry = open_registry(cfg).await?;

        match resource {
            ListResource::Tools { search, format } => {
                debug!("Listing tools with search: {:?}", search);
                let tools = registry.list_tools(search).await?;
                match format {
                    OutputFormat::Table => Self::display_tools_table(&tools),
                    _ => println!("{}", format.format_json(&serde_json::to_value(&tools)?)?),
                }
            }
            ListResource::Versions { tool_id, status, format } => {
                let status = status
                    .as_deref()
                    .map(str::parse::<VersionStatus>)
                    .transpose()
                    .map_err(CliError::InvalidArgument)?;
                debug!("Listing versions of {} with status {:?}", tool_id, status);
                let versions: Vec<ToolVersion> = registry
                    .list_versions(&tool_id, status)
                    .await?
                    .into_iter()
                    .map(ToolVersion::redacted)
                    .collect();
                match format {
                    OutputFormat::Table => Self::display_versions_table(&versions),
                    _ => println!("{}", format.format_json(&serde_json::to_value(&versions)?)?),
                }
            }
        }

        Ok(())
    }

    fn display_tools_table(tools: &[Tool]) {
        if tools.is_empty() {
            println!("{}", ColoredOutput::info("No tools found"));
            return;
        }

        println!("{}", ColoredOutput::success(&format!("Found {} tool(s):", tools.len())));
        println!();

        println!(
            "{:<38} {:<24} {:<28} {:<16}",
            ColoredOutput::highlight("ID"),
            ColoredOutput::highlight("Slug"),
            ColoredOutput::highlight("Name"),
            ColoredOutput::highlight("Created")
        );
        println!("{}", "-".repeat(108));

        for tool in tools {
            println!(
                "{:<38} {:<24} {:<28} {:<16}",
                tool.id,
                truncate_text(&tool.slug, 24),
                truncate_text(&tool.display_name, 28),
                tool.created_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    fn display_versions_table(versions: &[ToolVersion]) {
        if versions.is_empty() {
            println!("{}", ColoredOutput::info("No versions found"));
            return;
        }

        println!("{}", ColoredOutput::success(&format!("Found {} version(s):", versions.len())));
        println!();

        println!(
            "{:<38} {:<12} {:<12} {:<8} {:<40}",
            ColoredOutput::highlight("ID"),
            ColoredOutput::highlight("Version"),
            ColoredOutput::highlight("Status"),
            ColoredOutput::highlight("Method"),
            ColoredOutput::highlight("Endpoint")
        );
        println!("{}", "-".repeat(112));

        for version in versions {
            let status = match version.status {
                VersionStatus::Active => ColoredOutput::success(version.status.as_str()),
                VersionStatus::Deprecated => ColoredOutput::warning(version.status.as_str()),
                VersionStatus::Draft => ColoredOutput::info(version.status.as_str()),
            };
            println!(
                "{:<38} {:<12} {:<12} {:<8} {:<40}",
                version.id,
                truncate_text(&version.version, 12),
                status,
                version.endpoint_method.as_str(),
                truncate_text(&version.endpoint_url, 40)
            );
        }
    }
}
