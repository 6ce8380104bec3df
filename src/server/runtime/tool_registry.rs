use std::sync::Arc;

use rmcp::{
    handler::server::ServerHandler,
    model::{CallToolResult, ErrorData, ServerCapabilities, ServerInfo, Tool},
    tool_handler,
};
use tracing::Instrument;

use crate::{
    lib::{errors::BridgeError, telemetry::CallSpan},
    server::config::ServerConfig,
    tools::{
        self,
        cheat_engine::{
            bridge_error_to_error_data, validation_error_to_error_data, ApiCall, BaseResponse,
            CheatEngineClient, RequestValidationError,
        },
        ServerToolRouter,
    },
};

#[derive(Clone)]
pub struct CheatEngineServer {
    config: Arc<ServerConfig>,
    instructions: Arc<String>,
    tool_router: ServerToolRouter<Self>,
    client: CheatEngineClient,
}

impl CheatEngineServer {
    pub fn new(config: ServerConfig, instructions: String) -> Result<Self, BridgeError> {
        let client = CheatEngineClient::new(&config.cheat_engine)?;
        Ok(Self {
            config: Arc::new(config),
            instructions: Arc::new(instructions),
            tool_router: tools::build_router(Self::router),
            client,
        })
    }

    /// Every category router merged into one.
    pub fn router() -> ServerToolRouter<Self> {
        Self::process_router()
            + Self::memory_router()
            + Self::address_router()
            + Self::scan_router()
            + Self::utility_router()
            + Self::address_list_router()
    }

    /// Tool metadata without constructing a server.
    pub fn tool_definitions() -> Vec<Tool> {
        Self::router().list_all()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Validate, then forward. Validation failures never reach the network.
    pub(crate) async fn forward_checked(
        &self,
        tool: &'static str,
        call: Result<ApiCall, RequestValidationError>,
    ) -> Result<CallToolResult, ErrorData> {
        match call {
            Ok(call) => self.forward(tool, call).await,
            Err(err) => {
                tracing::debug!(
                    target: "cheat_engine_mcp::bridge",
                    tool,
                    error = %err,
                    "Rejected tool arguments"
                );
                Err(validation_error_to_error_data(err, tool))
            }
        }
    }

    /// Send one call and hand the plugin's JSON back as structured content.
    pub(crate) async fn forward(
        &self,
        tool: &'static str,
        call: ApiCall,
    ) -> Result<CallToolResult, ErrorData> {
        let endpoint = call.endpoint.path();
        let span = CallSpan::start(tool, endpoint);
        let sent = self
            .client
            .send(&call)
            .instrument(span.span().clone())
            .await;
        match sent {
            Ok(body) => {
                if BaseResponse::from_value(&body).reported_failure() {
                    span.finish("api_failure", None);
                    Ok(CallToolResult::structured_error(body))
                } else {
                    span.finish("ok", None);
                    Ok(CallToolResult::structured(body))
                }
            }
            Err(err) => {
                span.finish("bridge_error", err.http_status());
                Err(bridge_error_to_error_data(&err, tool, endpoint))
            }
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for CheatEngineServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some((*self.instructions).clone()),
            ..ServerInfo::default()
        }
    }
}
