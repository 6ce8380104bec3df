use std::path::PathBuf;

use config::ConfigError as ConfigLoaderError;
use rmcp::model::ErrorData;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Required field is missing.
    #[error("Configuration file {path} is missing `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Failures while talking to the Cheat Engine REST plugin.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to construct the HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
    #[error("Cheat Engine REST API at {url} is unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} timed out after {timeout_secs} seconds")]
    Timeout { url: String, timeout_secs: u64 },
    #[error("Cheat Engine REST API returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
    #[error("Cheat Engine REST API returned a non-JSON body for {url}: {source}")]
    InvalidResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl BridgeError {
    /// HTTP status reported by the plugin, if the request got that far.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            BridgeError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Target URL of the failed request.
    pub fn url(&self) -> Option<&str> {
        match self {
            BridgeError::ClientBuild { .. } => None,
            BridgeError::Unreachable { url, .. }
            | BridgeError::Timeout { url, .. }
            | BridgeError::HttpStatus { url, .. }
            | BridgeError::InvalidResponse { url, .. } => Some(url.as_str()),
        }
    }
}

/// Structured error metadata returned by MCP tools.
#[derive(Debug, Clone, Serialize)]
pub struct ToolErrorDescriptor {
    /// Error code.
    pub code: &'static str,
    /// User-facing message.
    pub message: &'static str,
    /// Recommended remediation.
    pub remediation: &'static str,
}

impl ToolErrorDescriptor {
    /// Simple constructor.
    pub const fn new(code: &'static str, message: &'static str, remediation: &'static str) -> Self {
        Self {
            code,
            message,
            remediation,
        }
    }

    /// Create a builder.
    pub fn builder(&self) -> ToolErrorDescriptorBuilder<'_> {
        ToolErrorDescriptorBuilder::new(self)
    }
}

/// Where a tool failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureOrigin {
    /// The MCP client sent arguments that were rejected locally.
    Request,
    /// The HTTP hop to the plugin failed.
    Bridge,
    /// The plugin answered, but not with something usable.
    Api,
    /// The server process itself refused to start.
    Launch,
}

impl FailureOrigin {
    fn as_str(&self) -> &'static str {
        match self {
            FailureOrigin::Request => "request",
            FailureOrigin::Bridge => "bridge",
            FailureOrigin::Api => "api",
            FailureOrigin::Launch => "launch",
        }
    }
}

/// Builder for error data that fails if required fields are missing.
pub struct ToolErrorDescriptorBuilder<'a> {
    descriptor: &'a ToolErrorDescriptor,
    retryable: Option<bool>,
    origin: Option<FailureOrigin>,
    details: Option<Value>,
    extra_fields: Map<String, Value>,
}

impl<'a> ToolErrorDescriptorBuilder<'a> {
    pub fn new(descriptor: &'a ToolErrorDescriptor) -> Self {
        Self {
            descriptor,
            retryable: None,
            origin: None,
            details: None,
            extra_fields: Map::new(),
        }
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn origin(mut self, origin: FailureOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_context_field(mut self, key: &str, value: Value) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }

    pub fn with_exit_code_value(mut self, exit_code: u8) -> Self {
        let numeric = Number::from(exit_code);
        self.extra_fields
            .insert("exit_code".into(), Value::Number(numeric));
        self
    }

    /// Request and launch failures are reported as invalid params; everything
    /// upstream of the bridge is an internal error.
    pub fn build(self) -> Result<ErrorData, ToolErrorBuilderError> {
        if self.descriptor.remediation.trim().is_empty() {
            return Err(ToolErrorBuilderError::MissingRemediation {
                code: self.descriptor.code,
            });
        }
        let retryable = self
            .retryable
            .ok_or(ToolErrorBuilderError::MissingRetryable {
                code: self.descriptor.code,
            })?;
        let origin = self.origin.ok_or(ToolErrorBuilderError::MissingOrigin {
            code: self.descriptor.code,
        })?;

        let mut data = Map::new();
        data.insert("code".into(), Value::String(self.descriptor.code.into()));
        data.insert(
            "remediation".into(),
            Value::String(self.descriptor.remediation.into()),
        );
        data.insert("retryable".into(), Value::Bool(retryable));
        data.insert("origin".into(), Value::String(origin.as_str().into()));
        if let Some(details) = self.details {
            data.insert("details".into(), details);
        }
        for (key, value) in self.extra_fields {
            data.insert(key, value);
        }

        let data = Some(Value::Object(data));
        Ok(match origin {
            FailureOrigin::Request | FailureOrigin::Launch => {
                ErrorData::invalid_params(self.descriptor.message, data)
            }
            FailureOrigin::Bridge | FailureOrigin::Api => {
                ErrorData::internal_error(self.descriptor.message, data)
            }
        })
    }
}

/// Errors when required builder fields are missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolErrorBuilderError {
    #[error("retryable is missing (code={code})")]
    MissingRetryable { code: &'static str },
    #[error("origin is missing (code={code})")]
    MissingOrigin { code: &'static str },
    #[error("remediation is empty (code={code})")]
    MissingRemediation { code: &'static str },
}

/// Standard error for authentication mismatches.
pub const AUTH_TOKEN_MISMATCH_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "AUTH_TOKEN_MISMATCH",
    "MCP_SHARED_TOKEN does not match config.toml [auth].token",
    "Set the same token in the MCP client environment and config.toml before retrying.",
);

/// Standard error when no token is provided.
pub const MCP_TOKEN_REQUIRED_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "MCP_TOKEN_REQUIRED",
    "MCP_SHARED_TOKEN is unset or shorter than 16 characters",
    "Set MCP_SHARED_TOKEN to the value of config.toml [auth].token (at least 16 characters).",
);

/// Standard error when executed without an MCP client.
pub const MCP_CLIENT_REQUIRED_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "MCP_CLIENT_REQUIRED",
    "This binary can only be executed via an MCP client",
    "Launch through an MCP client such as `npx @modelcontextprotocol/inspector target/release/cheat-engine-mcp`.",
);
