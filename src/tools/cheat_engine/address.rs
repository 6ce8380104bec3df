//! Symbol and module lookups.
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
    request::{default_true, AddressRequest},
};
use crate::server::runtime::CheatEngineServer;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAddressSafeRequest {
    /// Symbol, `module+offset` or export name to resolve.
    pub address_string: String,
    /// Resolve against Cheat Engine's own symbol table.
    #[serde(default)]
    pub local: bool,
}

impl GetAddressSafeRequest {
    pub fn to_call(&self) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("address_string", &self.address_string)?;
        Ok(ApiCall::post(
            Endpoint::GetAddressSafe,
            json!({
                "AddressString": self.address_string,
                "Local": self.local,
            }),
        ))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetNameFromAddressRequest {
    pub address: String,
    /// Allow `module+offset` results.
    #[serde(default = "default_true")]
    pub module_names: bool,
    /// Allow registered symbol names.
    #[serde(default = "default_true")]
    pub symbols: bool,
    /// Allow section names.
    #[serde(default)]
    pub sections: bool,
}

impl GetNameFromAddressRequest {
    pub fn to_call(&self) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("address", &self.address)?;
        Ok(ApiCall::post(
            Endpoint::GetNameFromAddress,
            json!({
                "Address": self.address,
                "ModuleNames": self.module_names,
                "Symbols": self.symbols,
                "Sections": self.sections,
            }),
        ))
    }
}

#[tool_router(router = address_router, vis = "pub(crate)")]
impl CheatEngineServer {
    #[tool(
        name = "get_address_safe",
        description = "Resolve a symbol or module+offset expression to an address; null when it does not resolve"
    )]
    async fn get_address_safe(
        &self,
        Parameters(request): Parameters<GetAddressSafeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("get_address_safe", request.to_call())
            .await
    }

    #[tool(
        name = "get_name_from_address",
        description = "Describe an address as a symbol, module+offset or hex string"
    )]
    async fn get_name_from_address(
        &self,
        Parameters(request): Parameters<GetNameFromAddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("get_name_from_address", request.to_call())
            .await
    }

    #[tool(
        name = "in_module",
        description = "Check whether an address lies inside a loaded module"
    )]
    async fn in_module(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("in_module", request.to_call(Endpoint::InModule))
            .await
    }

    #[tool(
        name = "in_system_module",
        description = "Check whether an address lies inside a module from the Windows directory"
    )]
    async fn in_system_module(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "in_system_module",
            request.to_call(Endpoint::InSystemModule),
        )
        .await
    }
}
