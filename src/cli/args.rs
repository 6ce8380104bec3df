//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};

use super::{build_launch_args, resolve_config_path, resolve_token, LaunchProfile, TransportMode};

/// Parsed command intent from CLI.
#[derive(Debug, Clone)]
pub enum ParsedCommand {
    RunServer(LaunchProfile),
    Cli(CliCommand, LaunchProfile),
}

/// Top-level optional CLI commands.
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Print the tool catalog as JSON.
    #[command(about = "Print the MCP tool catalog as JSON")]
    Tools(ToolsArgs),
    /// Query the Cheat Engine REST plugin health endpoint.
    #[command(about = "Check that the Cheat Engine REST plugin is reachable")]
    Health,
}

/// Arguments for `tools`.
#[derive(Debug, Clone, Args)]
#[command(
    after_help = "Hint: use `cheat-engine-mcp tools --category memory` to list only the memory read/write tools."
)]
pub struct ToolsArgs {
    /// Restrict output to one category (process, memory, address, scan, utility, address_list).
    #[arg(long)]
    pub category: Option<String>,
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Cheat Engine MCP bridge (forwards MCP tool calls to the Cheat Engine REST plugin)",
    long_about = None
)]
pub struct LaunchProfileArgs {
    /// Select stdio (default) or tcp.
    #[arg(long, value_enum, default_value_t = TransportMode::Stdio)]
    pub transport: TransportMode,
    /// Path to config.toml (overrides MCP_CONFIG_PATH).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
    /// Explicit token override via CLI.
    #[arg(long = "token")]
    pub token_override: Option<String>,
    /// Optional CLI command mode.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

impl LaunchProfileArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build(self) -> Result<LaunchProfile> {
        let (config_path, config_required) = resolve_config_path(self.config_override)?;
        let (shared_token, token_source) = resolve_token(self.token_override);

        let launch_args = build_launch_args(self.transport, &config_path);

        Ok(LaunchProfile {
            config_path,
            config_required,
            transport: self.transport,
            shared_token,
            token_source,
            launch_args,
        })
    }

    /// Parse CLI args into either server launch mode or utility command mode.
    pub fn into_command(mut self) -> Result<ParsedCommand> {
        match self.command.take() {
            Some(command) => {
                validate_command(&command)?;
                Ok(ParsedCommand::Cli(command, self.build()?))
            }
            None => Ok(ParsedCommand::RunServer(self.build()?)),
        }
    }
}

fn validate_command(command: &CliCommand) -> Result<()> {
    use crate::tools::catalog;

    match command {
        CliCommand::Tools(args) => {
            if let Some(category) = &args.category {
                if catalog::find_category(category).is_none() {
                    return Err(anyhow!(
                        "unknown tool category `{category}`: expected one of {}",
                        catalog::category_names().join(", ")
                    ));
                }
            }
        }
        CliCommand::Health => {}
    }

    Ok(())
}
