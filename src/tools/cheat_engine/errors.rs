//! Argument validation errors and error-to-ErrorData mapping for Cheat Engine tools.
use rmcp::model::ErrorData;
use serde_json::{json, Value};
use thiserror::Error;

use crate::lib::errors::{BridgeError, FailureOrigin, ToolErrorDescriptor};

const INVALID_REQUEST_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "invalid_request",
    "The tool arguments are invalid",
    "Fix the argument named in details and call the tool again.",
);
const API_UNREACHABLE_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "api_unreachable",
    "The Cheat Engine REST API could not be reached",
    "Start Cheat Engine with the REST plugin loaded and check cheat_engine.host/port (or MCP_HOST/MCP_PORT).",
);
const API_TIMEOUT_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "api_timeout",
    "The Cheat Engine REST API did not answer in time",
    "Narrow the scan range or raise cheat_engine.timeout_secs in config.toml.",
);
const API_HTTP_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "api_http_error",
    "The Cheat Engine REST API returned an HTTP error",
    "Check the plugin log in Cheat Engine; 4xx usually means the plugin version does not expose this endpoint.",
);
const API_INVALID_RESPONSE_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "api_invalid_response",
    "The Cheat Engine REST API returned a body that is not JSON",
    "Verify that cheat_engine.base_path points at the plugin API and not another web server.",
);
const BRIDGE_INTERNAL_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "bridge_internal_error",
    "The HTTP client for the Cheat Engine REST API could not be created",
    "Check the server logs; restarting the MCP server usually resolves this.",
);

/// Argument problems detected before any HTTP request is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestValidationError {
    #[error("`{field}` must not be empty")]
    Blank { field: &'static str },
    #[error("`{field}` must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: i128,
        max: i128,
        value: i128,
    },
    #[error("`{field}` must be a finite number")]
    NotFinite { field: &'static str },
    #[error("AOB pattern token `{token}` is not a hex byte or wildcard")]
    InvalidAobToken { token: String },
    #[error("`{field}` is required when scan_option is {scan_option}")]
    MissingScanInput {
        field: &'static str,
        scan_option: &'static str,
    },
    #[error("start_address {start:#x} is greater than stop_address {stop:#x}")]
    InvertedRange { start: u64, stop: u64 },
    #[error("one of `id`, `index` or `description` is required to select an entry")]
    MissingSelector,
}

pub(crate) fn require_non_blank(
    field: &'static str,
    value: &str,
) -> Result<(), RequestValidationError> {
    if value.trim().is_empty() {
        return Err(RequestValidationError::Blank { field });
    }
    Ok(())
}

pub(crate) fn require_range(
    field: &'static str,
    value: i128,
    min: i128,
    max: i128,
) -> Result<(), RequestValidationError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(RequestValidationError::OutOfRange {
        field,
        min,
        max,
        value,
    })
}

pub fn validation_error_to_error_data(err: RequestValidationError, tool: &str) -> ErrorData {
    let details = json!({ "reason": err.to_string() });
    build_error_data(&INVALID_REQUEST_ERROR, details, FailureOrigin::Request, false, tool)
}

pub fn bridge_error_to_error_data(err: &BridgeError, tool: &str, endpoint: &str) -> ErrorData {
    let mut details = json!({
        "endpoint": endpoint,
        "reason": err.to_string(),
    });
    if let Some(url) = err.url() {
        details["url"] = Value::String(url.to_string());
    }

    match err {
        BridgeError::Unreachable { .. } => build_error_data(
            &API_UNREACHABLE_ERROR,
            details,
            FailureOrigin::Bridge,
            true,
            tool,
        ),
        BridgeError::Timeout { timeout_secs, .. } => {
            details["timeout_secs"] = json!(timeout_secs);
            build_error_data(
                &API_TIMEOUT_ERROR,
                details,
                FailureOrigin::Bridge,
                true,
                tool,
            )
        }
        BridgeError::HttpStatus { status, .. } => {
            details["status"] = json!(status);
            build_error_data(
                &API_HTTP_ERROR,
                details,
                FailureOrigin::Api,
                *status >= 500,
                tool,
            )
        }
        BridgeError::InvalidResponse { .. } => build_error_data(
            &API_INVALID_RESPONSE_ERROR,
            details,
            FailureOrigin::Api,
            false,
            tool,
        ),
        BridgeError::ClientBuild { .. } => build_error_data(
            &BRIDGE_INTERNAL_ERROR,
            details,
            FailureOrigin::Bridge,
            false,
            tool,
        ),
    }
}

fn build_error_data(
    desc: &'static ToolErrorDescriptor,
    details: Value,
    origin: FailureOrigin,
    retryable: bool,
    tool: &str,
) -> ErrorData {
    desc.builder()
        .details(details)
        .origin(origin)
        .retryable(retryable)
        .with_context_field("tool", Value::String(tool.to_string()))
        .build()
        .unwrap_or_else(|err| {
            ErrorData::internal_error(
                format!("{}: {err}", desc.message),
                Some(json!({ "code": desc.code, "tool": tool })),
            )
        })
}
