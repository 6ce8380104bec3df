//! CLI entrypoint module structure.
use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};

use crate::{
    server::{config::ServerConfig, runtime::CheatEngineServer},
    tools::{catalog, cheat_engine::CheatEngineClient},
};

pub mod args;
pub mod profile;

pub use args::{CliCommand, LaunchProfileArgs, ParsedCommand, ToolsArgs};
pub use profile::{
    build_launch_args, resolve_config_path, resolve_token, LaunchProfile, TokenSource,
    TransportMode,
};

/// Execute CLI command mode and return a user-facing result payload.
pub async fn execute_cli_command(command: CliCommand, config: &ServerConfig) -> Result<String> {
    match command {
        CliCommand::Tools(args) => render_tool_catalog(args.category.as_deref()),
        CliCommand::Health => check_health(config).await,
    }
}

/// Render registered tools (optionally one category) as a JSON document.
fn render_tool_catalog(category: Option<&str>) -> Result<String> {
    let selected = match category {
        Some(name) => vec![catalog::find_category(name)
            .ok_or_else(|| anyhow!("unknown tool category `{name}`"))?],
        None => catalog::CATEGORIES.iter().collect(),
    };

    let definitions = CheatEngineServer::tool_definitions();
    let mut tools = Vec::new();
    for category in &selected {
        for name in category.tools {
            let tool = definitions
                .iter()
                .find(|tool| tool.name.as_ref() == *name)
                .ok_or_else(|| anyhow!("catalog tool `{name}` is not registered"))?;
            let route = catalog::route(name)
                .ok_or_else(|| anyhow!("catalog tool `{name}` has no route"))?;
            tools.push(json!({
                "name": name,
                "category": category.name,
                "method": route.method(),
                "endpoint": route.endpoint().map(|endpoint| endpoint.path()),
                "description": tool.description.as_deref().unwrap_or_default(),
                "input_schema": Value::Object((*tool.input_schema).clone()),
            }));
        }
    }

    let payload = json!({
        "tool_count": tools.len(),
        "tools": tools,
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Call the plugin's `health` endpoint and summarise the typed response.
///
/// An unhealthy answer is an error so scripts can gate on the exit status.
async fn check_health(config: &ServerConfig) -> Result<String> {
    let client = CheatEngineClient::new(&config.cheat_engine)?;
    let health = client
        .health()
        .await
        .with_context(|| format!("health check against {} failed", client.api_root()))?;

    let healthy = health.is_healthy();
    let payload = serde_json::to_string_pretty(&json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "api_root": client.api_root(),
        "response": health,
    }))?;
    if !healthy {
        bail!("Cheat Engine REST API reported an unhealthy status:\n{payload}");
    }
    Ok(payload)
}
