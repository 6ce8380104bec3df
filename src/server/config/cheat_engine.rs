use std::{path::Path, time::Duration};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_CE_HOST: &str = "localhost";
pub const DEFAULT_CE_PORT: u16 = 6300;
pub const DEFAULT_API_BASE_PATH: &str = "/api/cheatengine";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;

/// Location of the Cheat Engine REST plugin and per-request limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheatEngineConfig {
    pub host: String,
    pub port: u16,
    pub base_path: String,
    pub timeout_secs: u64,
}

impl Default for CheatEngineConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CE_HOST.to_string(),
            port: DEFAULT_CE_PORT,
            base_path: DEFAULT_API_BASE_PATH.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl CheatEngineConfig {
    /// `http://{host}:{port}`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Base URL plus the API path prefix.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url(), self.base_path)
    }

    pub fn swagger_url(&self) -> String {
        format!("{}/swagger", self.base_url())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawCheatEngineSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_path: Option<String>,
    pub timeout_secs: Option<u64>,
}

pub fn parse_cheat_engine_section(
    raw: Option<RawCheatEngineSection>,
    path: &Path,
) -> Result<CheatEngineConfig, ConfigError> {
    let raw = raw.unwrap_or_default();

    let host = raw.host.unwrap_or_else(|| DEFAULT_CE_HOST.to_string());
    validate_host(path, &host)?;

    let port = raw.port.unwrap_or(DEFAULT_CE_PORT);
    if port == 0 {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "cheat_engine.port",
            message: "port must be non-zero".into(),
        });
    }

    let base_path = normalize_base_path(
        path,
        raw.base_path
            .unwrap_or_else(|| DEFAULT_API_BASE_PATH.to_string()),
    )?;

    let timeout_secs = raw.timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout_secs) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "cheat_engine.timeout_secs",
            message: format!("timeout must be between 1 and {MAX_REQUEST_TIMEOUT_SECS} seconds"),
        });
    }

    Ok(CheatEngineConfig {
        host,
        port,
        base_path,
        timeout_secs,
    })
}

fn validate_host(path: &Path, host: &str) -> Result<(), ConfigError> {
    if host.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "cheat_engine.host",
            message: "host must not be empty".into(),
        });
    }
    if host.contains("://") || host.contains('/') || host.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "cheat_engine.host",
            message: format!("`{host}` must be a bare host name without scheme or path"),
        });
    }
    Ok(())
}

/// Empty means "serve from the root"; anything else needs a leading slash.
fn normalize_base_path(path: &Path, raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "cheat_engine.base_path",
            message: "base_path must start with `/`".into(),
        });
    }
    Ok(trimmed.to_string())
}
