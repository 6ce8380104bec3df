use rmcp::{
    model::{CallToolResult, ErrorData},
    tool, tool_router, Json,
};

use super::{
    client::{ApiCall, Endpoint},
    models::ApiInfoResponse,
};
use crate::{server::config::CheatEngineConfig, server::runtime::CheatEngineServer};

const API_DESCRIPTION: &str = "REST API for Cheat Engine MCP Server";

pub fn api_info(config: &CheatEngineConfig) -> ApiInfoResponse {
    ApiInfoResponse {
        base_url: config.base_url(),
        api_root: config.api_root(),
        swagger_ui: config.swagger_url(),
        description: API_DESCRIPTION.to_string(),
    }
}

#[tool_router(router = utility_router, vis = "pub(crate)")]
impl CheatEngineServer {
    #[tool(
        name = "get_api_info",
        description = "Describe the Cheat Engine REST API this server forwards to (answered locally)"
    )]
    async fn get_api_info(&self) -> Result<Json<ApiInfoResponse>, ErrorData> {
        Ok(Json(api_info(&self.config().cheat_engine)))
    }

    #[tool(
        name = "get_health",
        description = "Query the health endpoint of the Cheat Engine REST API"
    )]
    async fn get_health(&self) -> Result<CallToolResult, ErrorData> {
        self.forward("get_health", ApiCall::get(Endpoint::Health))
            .await
    }
}
