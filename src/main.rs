//! Entry point for the Cheat Engine MCP bridge.
use std::process::ExitCode;

use anyhow::Error;
use cheat_engine_mcp::{
    cli::{execute_cli_command, CliCommand, LaunchProfile, LaunchProfileArgs, ParsedCommand},
    lib::telemetry,
    server::{
        config::{EnvOverrides, ServerConfig},
        runtime::{self, RuntimeExit},
    },
};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = LaunchProfileArgs::parse();
    let command = args.into_command().map_err(RuntimeExit::from_error)?;

    match command {
        ParsedCommand::RunServer(profile) => {
            let config = load_config(&profile)?;
            runtime::run_server(profile, config).await
        }
        ParsedCommand::Cli(command, profile) => {
            let config = load_config(&profile)?;
            handle_cli_command(command, &config).await
        }
    }
}

fn load_config(profile: &LaunchProfile) -> Result<ServerConfig, RuntimeExit> {
    ServerConfig::load(
        profile.config_path.clone(),
        profile.config_required,
        EnvOverrides::from_env(),
    )
    .map_err(|err| RuntimeExit::from_error(Error::new(err)))
}

async fn handle_cli_command(command: CliCommand, config: &ServerConfig) -> Result<(), RuntimeExit> {
    let message = execute_cli_command(command, config)
        .await
        .map_err(RuntimeExit::from_error)?;
    println!("{message}");
    Ok(())
}
