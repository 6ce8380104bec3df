//! Process tools: Lua execution, process and thread enumeration.
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorData},
    tool, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use super::{
    client::{ApiCall, Endpoint},
    errors::{require_non_blank, RequestValidationError},
};
use crate::server::runtime::CheatEngineServer;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteLuaRequest {
    /// Lua source to run inside Cheat Engine.
    pub code: String,
}

impl ExecuteLuaRequest {
    pub fn to_call(&self) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("code", &self.code)?;
        Ok(ApiCall::post(
            Endpoint::ExecuteLua,
            json!({ "Code": self.code }),
        ))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OpenProcessRequest {
    /// Process id (decimal or hex) or executable name, e.g. `game.exe`.
    pub process: String,
}

impl OpenProcessRequest {
    pub fn to_call(&self) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("process", &self.process)?;
        Ok(ApiCall::post(
            Endpoint::OpenProcess,
            json!({ "Process": self.process }),
        ))
    }
}

#[tool_router(router = process_router, vis = "pub(crate)")]
impl CheatEngineServer {
    #[tool(
        name = "execute_lua",
        description = "Execute Lua code inside Cheat Engine and return its result"
    )]
    async fn execute_lua(
        &self,
        Parameters(request): Parameters<ExecuteLuaRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("execute_lua", request.to_call()).await
    }

    #[tool(
        name = "get_process_list",
        description = "List the processes running on the machine"
    )]
    async fn get_process_list(&self) -> Result<CallToolResult, ErrorData> {
        self.forward("get_process_list", ApiCall::get(Endpoint::ProcessList))
            .await
    }

    #[tool(
        name = "open_process",
        description = "Attach Cheat Engine to a process by id or executable name"
    )]
    async fn open_process(
        &self,
        Parameters(request): Parameters<OpenProcessRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("open_process", request.to_call()).await
    }

    #[tool(
        name = "get_thread_list",
        description = "List the threads of the currently opened process"
    )]
    async fn get_thread_list(&self) -> Result<CallToolResult, ErrorData> {
        self.forward("get_thread_list", ApiCall::get(Endpoint::ThreadList))
            .await
    }

    #[tool(
        name = "get_process_status",
        description = "Report which process is open, its id and whether it is still alive"
    )]
    async fn get_process_status(&self) -> Result<CallToolResult, ErrorData> {
        self.forward("get_process_status", ApiCall::get(Endpoint::ProcessStatus))
            .await
    }
}
