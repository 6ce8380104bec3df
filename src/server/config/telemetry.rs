use tracing::info;

use super::ServerConfig;

pub fn log_loaded(config: &ServerConfig) {
    info!(
        target: "cheat_engine_mcp::config",
        path = %config.source_path.display(),
        host = %config.server.host,
        port = config.server.port,
        auth_enabled = config.auth.is_enabled(),
        api_root = %config.cheat_engine.api_root(),
        timeout_secs = config.cheat_engine.timeout_secs,
        "Configuration loaded successfully"
    );
}
