use crate::{cli::LaunchProfile, server::config::ServerConfig};

/// Build the `ServerInfo.instructions` string shown to MCP clients.
pub fn build_instructions(profile: &LaunchProfile, config: &ServerConfig) -> String {
    format!(
        "Forwards tool calls to the Cheat Engine REST API at {api_root}. Open a process with open_process before reading or writing its memory; *_local tools act on Cheat Engine's own memory. Loaded config {path}; serving in {transport} mode.",
        api_root = config.cheat_engine.api_root(),
        path = config.source_path.display(),
        transport = profile.transport.as_str(),
    )
}
