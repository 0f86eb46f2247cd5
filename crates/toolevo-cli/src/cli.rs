//! CLI argument definitions using clap

use crate::error::CliResult;
use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use toolevo_server::{ServerConfig, ServiceRole};

#[derive(Parser)]
#[command(
    name = "toolevo",
    about = "toolevo - versioned tool registry, gateway and orchestrator",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML config file; flags and env vars override its values
    #[arg(long, env = "TOOLEVO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database URL
    #[arg(long, env = "TOOLEVO_DB_PATH", help = "SQLite database URL (sqlite://./data/toolevo.db)")]
    pub db_path: Option<String>,

    #[arg(long, env = "TOOLEVO_DB_MAX_CONNECTIONS")]
    pub db_max_connections: Option<u32>,

    /// Registry base URL used by a standalone gateway
    #[arg(long, env = "TOOLEVO_REGISTRY_URL")]
    pub registry_url: Option<String>,

    /// Gateway base URL used by a standalone orchestrator
    #[arg(long, env = "TOOLEVO_GATEWAY_URL")]
    pub gateway_url: Option<String>,

    #[arg(long, env = "TOOLEVO_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    #[arg(long, env = "TOOLEVO_CONNECT_TIMEOUT_MS")]
    pub connect_timeout_ms: Option<u64>,

    #[arg(long, env = "TOOLEVO_REGISTRY_ADDR")]
    pub registry_addr: Option<String>,

    #[arg(long, env = "TOOLEVO_GATEWAY_ADDR")]
    pub gateway_addr: Option<String>,

    #[arg(long, env = "TOOLEVO_ORCHESTRATOR_ADDR")]
    pub orchestrator_addr: Option<String>,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags and env vars.
    pub fn server_config(&self) -> CliResult<ServerConfig> {
        let mut cfg = match &self.config {
            Some(path) => ServerConfig::from_yaml_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(v) = &self.db_path {
            cfg.database_url = v.clone();
        }
        if let Some(v) = self.db_max_connections {
            cfg.max_connections = v;
        }
        if let Some(v) = &self.registry_url {
            cfg.registry_url = Some(v.clone());
        }
        if let Some(v) = &self.gateway_url {
            cfg.gateway_url = Some(v.clone());
        }
        if let Some(v) = self.request_timeout_ms {
            cfg.request_timeout_ms = v;
        }
        if let Some(v) = self.connect_timeout_ms {
            cfg.connect_timeout_ms = v;
        }
        if let Some(v) = &self.registry_addr {
            cfg.registry_addr = v.clone();
        }
        if let Some(v) = &self.gateway_addr {
            cfg.gateway_addr = v.clone();
        }
        if let Some(v) = &self.orchestrator_addr {
            cfg.orchestrator_addr = v.clone();
        }
        Ok(cfg)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start one service, or all of them in one process
    Serve {
        #[arg(value_enum, default_value = "all")]
        role: ServeRole,
    },

    /// Initialize database and run migrations
    Migrate,

    /// List tools and versions
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Run a tool through the in-process pipeline and print the envelope
    Execute {
        /// Tool slug
        slug: String,

        /// Input data as JSON string
        #[arg(short, long, help = "Input data as JSON string")]
        input: Option<String>,

        /// Input data from file
        #[arg(long, conflicts_with = "input", help = "Read input data from file (JSON or YAML)")]
        input_file: Option<String>,

        #[arg(long, value_enum, default_value = "pretty", help = "Output format")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List registered tools
    Tools {
        /// Substring match on slug or display name
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, value_enum, default_value = "table", help = "Output format")]
        format: OutputFormat,
    },

    /// List the versions of one tool
    Versions {
        tool_id: String,

        /// Only versions with this status (draft, active, deprecated)
        #[arg(long)]
        status: Option<String>,

        #[arg(long, value_enum, default_value = "table", help = "Output format")]
        format: OutputFormat,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServeRole {
    All,
    Registry,
    Gateway,
    Orchestrator,
}

impl From<ServeRole> for ServiceRole {
    fn from(value: ServeRole) -> Self {
        match value {
            ServeRole::All => ServiceRole::All,
            ServeRole::Registry => ServiceRole::Registry,
            ServeRole::Gateway => ServiceRole::Gateway,
            ServeRole::Orchestrator => ServiceRole::Orchestrator,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// Pretty-printed JSON
    Pretty,
    /// Compact JSON
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Format a JSON value according to the output format. `Table` falls back
    /// to pretty JSON; commands with a table view handle it themselves.
    pub fn format_json(&self, value: &JsonValue) -> CliResult<String> {
        Ok(match self {
            Self::Table | Self::Pretty => serde_json::to_string_pretty(value)?,
            Self::Json => serde_json::to_string(value)?,
            Self::Yaml => serde_yaml::to_string(value)?,
        })
    }
}
