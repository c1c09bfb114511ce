//! Command-line surface of `azdo-endpoint`.

use std::path::PathBuf;

use azdo_client::{
    API_VERSION_ENV, DEFAULT_API_VERSION, HTTP_TIMEOUT_ENV, ORG_SERVICE_URL_ENV,
    PERSONAL_ACCESS_TOKEN_ENV,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "azdo-endpoint", version)]
#[command(about = "Run lifecycle operations of the Azure DevOps GitHub service connection resource")]
pub struct Cli {
    /// Azure DevOps organisation URL, e.g. https://dev.azure.com/contoso.
    #[arg(long, env = ORG_SERVICE_URL_ENV, global = true)]
    pub org_service_url: Option<String>,

    /// Personal access token for the organisation.
    #[arg(long, env = PERSONAL_ACCESS_TOKEN_ENV, hide_env_values = true, global = true)]
    pub personal_access_token: Option<String>,

    /// Service endpoint REST API version.
    #[arg(long, env = API_VERSION_ENV, default_value = DEFAULT_API_VERSION, global = true)]
    pub api_version: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = HTTP_TIMEOUT_ENV, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the resource schema as JSON.
    Schema,
    /// Create the endpoint described by a state document and print the new state.
    Create(StateArgs),
    /// Refresh a state document from the service and print it.
    Read(StateArgs),
    /// Push a state document's configuration to the service and print the new state.
    Update(StateArgs),
    /// Delete the endpoint recorded in a state document.
    Delete(StateArgs),
}

#[derive(Debug, Args)]
pub struct StateArgs {
    /// State document (`{"id": ..., "attributes": {...}}`); `-` reads stdin.
    #[arg(long, default_value = "-")]
    pub state: PathBuf,
}
