//! Telemetry initialization and per-call span helpers.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, warn, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs.
///
/// Logs go to stderr; stdout belongs to the MCP stdio transport.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper recording one forwarded tool call.
pub struct CallSpan {
    span: Span,
    started_at: Instant,
    call_id: Uuid,
    tool: &'static str,
}

impl CallSpan {
    /// Start a call span.
    pub fn start(tool: &'static str, endpoint: &'static str) -> Self {
        let call_id = Uuid::new_v4();
        let span = info_span!(
            target: "cheat_engine_mcp::bridge",
            "tool_call",
            %call_id,
            tool,
            endpoint
        );
        Self {
            span,
            started_at: Instant::now(),
            call_id,
            tool,
        }
    }

    /// Span to attach work of this call to, e.g. via `Instrument`.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Close the span while recording the outcome.
    pub fn finish(self, status: &'static str, http_status: Option<u16>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        if status == "ok" {
            info!(
                target: "cheat_engine_mcp::bridge",
                call_id = %self.call_id,
                tool = self.tool,
                status = status,
                elapsed_ms = elapsed_ms,
                "Completed tool call"
            );
        } else {
            warn!(
                target: "cheat_engine_mcp::bridge",
                call_id = %self.call_id,
                tool = self.tool,
                status = status,
                http_status = http_status,
                elapsed_ms = elapsed_ms,
                "Tool call did not succeed"
            );
        }
    }
}

/// Payload for logging MCP runtime state as structured telemetry.
#[derive(Debug, Serialize)]
pub struct RuntimeModeTelemetry<'a> {
    pub transport: &'a str,
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub config_path: &'a str,
    pub api_root: &'a str,
    pub tool_count: usize,
    pub auth_enabled: bool,
    pub launch_args: &'a [String],
}

/// Emit runtime mode to `tracing`.
pub fn emit_runtime_mode(telemetry: &RuntimeModeTelemetry<'_>) {
    info!(
        target: "cheat_engine_mcp::runtime",
        transport = telemetry.transport,
        host = telemetry.host.unwrap_or(""),
        port = telemetry.port.unwrap_or_default(),
        config_path = telemetry.config_path,
        api_root = telemetry.api_root,
        tool_count = telemetry.tool_count,
        auth_enabled = telemetry.auth_enabled,
        launch_args = ?telemetry.launch_args,
        "Started MCP server"
    );
}
