//! Load and validate server configuration.
use std::{env, path::PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod auth;
pub mod cheat_engine;
pub mod server;
pub mod telemetry;

pub use auth::{parse_auth_section, AuthSection, RawAuthSection};
pub use cheat_engine::{
    parse_cheat_engine_section, CheatEngineConfig, RawCheatEngineSection, DEFAULT_API_BASE_PATH,
    DEFAULT_CE_HOST, DEFAULT_CE_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use server::{parse_server_section, RawServerSection, ServerSection, DEFAULT_HOST, DEFAULT_PORT};

const CE_HOST_ENV_KEY: &str = "MCP_HOST";
const CE_PORT_ENV_KEY: &str = "MCP_PORT";

/// Top-level configuration container.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub auth: AuthSection,
    pub cheat_engine: CheatEngineConfig,
    pub source_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawServerConfig {
    server: Option<RawServerSection>,
    auth: Option<RawAuthSection>,
    cheat_engine: Option<RawCheatEngineSection>,
}

/// `MCP_HOST` / `MCP_PORT` overrides for the plugin location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub host: Option<String>,
    pub port: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let read = |key: &str| {
            env::var(key)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            host: read(CE_HOST_ENV_KEY),
            port: read(CE_PORT_ENV_KEY),
        }
    }
}

impl ServerConfig {
    /// Built-in defaults, used when no configuration file exists.
    pub fn defaults(source_path: PathBuf) -> Self {
        Self {
            server: ServerSection::default(),
            auth: AuthSection::default(),
            cheat_engine: CheatEngineConfig::default(),
            source_path,
        }
    }

    /// Load configuration; a missing optional file falls back to defaults.
    pub fn load(
        path: PathBuf,
        required: bool,
        overrides: EnvOverrides,
    ) -> Result<Self, ConfigError> {
        info!(
            target: "cheat_engine_mcp::config",
            path = %path.display(),
            required,
            "Starting configuration load"
        );

        let builder = config::Config::builder()
            .add_source(config::File::from(path.clone()).required(required))
            .set_override_option("cheat_engine.host", overrides.host)
            .and_then(|builder| builder.set_override_option("cheat_engine.port", overrides.port))
            .map_err(|err| ConfigError::from_read_error(path.clone(), err))?;

        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "cheat_engine_mcp::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawServerConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "cheat_engine_mcp::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "cheat_engine_mcp::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    fn from_raw(raw: RawServerConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let server = parse_server_section(raw.server, &path)?;
        let auth = parse_auth_section(raw.auth, &path)?;
        let cheat_engine = parse_cheat_engine_section(raw.cheat_engine, &path)?;

        Ok(Self {
            server,
            auth,
            cheat_engine,
            source_path: path,
        })
    }
}
