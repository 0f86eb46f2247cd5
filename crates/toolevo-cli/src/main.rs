//! toolevo CLI main entry point

use clap::Parser;
use toolevo_cli::{
    cli::{Cli, Commands},
    commands::{ExecuteCommand, ListCommand, MigrateCommand, ServeCommand},
    error::CliResult,
    utils::{init_tracing, ColoredOutput},
};
use tracing::info;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing()?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    info!("toolevo v{}", env!("CARGO_PKG_VERSION"));
    let cfg = cli.server_config()?;

    match cli.command {
        Commands::Serve { role } => ServeCommand::run(&cfg, role).await,
        Commands::Migrate => MigrateCommand::run(&cfg).await,
        Commands::List { resource } => ListCommand::run(&cfg, resource).await,
        Commands::Execute { slug, input, input_file, format } => {
            ExecuteCommand::run(&cfg, &slug, input, input_file, format).await.map(|_| ())
        }
    }
}
