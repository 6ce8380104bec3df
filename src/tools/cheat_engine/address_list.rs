//! Cheat table (address list) management.
//!
//! These endpoints belong to the newer plugin API and use camelCase bodies;
//! variable types travel as their numeric code.
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
    errors::RequestValidationError,
    request::insert_some,
    scan::VariableType,
};
use crate::server::runtime::CheatEngineServer;

fn default_description() -> String {
    "New Entry".to_string()
}

fn default_zero() -> String {
    "0".to_string()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddEntryRequest {
    #[serde(default = "default_description")]
    pub description: String,
    /// Address expression, e.g. `0x12345` or `game.exe+1234`.
    #[serde(default = "default_zero")]
    pub address: String,
    #[serde(default)]
    pub var_type: VariableType,
    #[serde(default = "default_zero")]
    pub value: String,
}

impl AddEntryRequest {
    pub fn to_call(&self) -> ApiCall {
        ApiCall::post(
            Endpoint::AddressListAdd,
            json!({
                "description": self.description,
                "address": self.address,
                "varType": self.var_type.code(),
                "value": self.value,
            }),
        )
    }
}

/// Which record an update or delete applies to. At least one field is required.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct EntrySelector {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl EntrySelector {
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        let has_description = self
            .description
            .as_deref()
            .is_some_and(|description| !description.trim().is_empty());
        if self.id.is_none() && self.index.is_none() && !has_description {
            return Err(RequestValidationError::MissingSelector);
        }
        Ok(())
    }

    fn to_body(&self) -> serde_json::Value {
        let mut body = json!({});
        insert_some(&mut body, "id", self.id);
        insert_some(&mut body, "index", self.index);
        insert_some(&mut body, "description", self.description.clone());
        body
    }

    pub fn to_delete_call(&self) -> Result<ApiCall, RequestValidationError> {
        self.validate()?;
        Ok(ApiCall::post(Endpoint::AddressListDelete, self.to_body()))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateEntryRequest {
    #[serde(flatten)]
    pub selector: EntrySelector,
    #[serde(default)]
    pub new_description: Option<String>,
    #[serde(default)]
    pub new_address: Option<String>,
    #[serde(default)]
    pub new_var_type: Option<VariableType>,
    #[serde(default)]
    pub new_value: Option<String>,
    /// Freeze (`true`) or unfreeze the record.
    #[serde(default)]
    pub active: Option<bool>,
}

impl UpdateEntryRequest {
    pub fn to_call(&self) -> Result<ApiCall, RequestValidationError> {
        self.selector.validate()?;
        let mut body = self.selector.to_body();
        insert_some(&mut body, "newDescription", self.new_description.clone());
        insert_some(&mut body, "newAddress", self.new_address.clone());
        insert_some(
            &mut body,
            "newVarType",
            self.new_var_type.map(|var_type| var_type.code()),
        );
        insert_some(&mut body, "newValue", self.new_value.clone());
        insert_some(&mut body, "active", self.active);
        Ok(ApiCall::post(Endpoint::AddressListUpdate, body))
    }
}

#[tool_router(router = address_list_router, vis = "pub(crate)")]
impl CheatEngineServer {
    #[tool(
        name = "get_address_list",
        description = "List every record in the cheat table"
    )]
    async fn get_address_list(&self) -> Result<CallToolResult, ErrorData> {
        self.forward("get_address_list", ApiCall::get(Endpoint::AddressList))
            .await
    }

    #[tool(
        name = "add_address_list_entry",
        description = "Add a record to the cheat table"
    )]
    async fn add_address_list_entry(
        &self,
        Parameters(request): Parameters<AddEntryRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward("add_address_list_entry", request.to_call())
            .await
    }

    #[tool(
        name = "update_address_list_entry",
        description = "Update a cheat table record selected by id, index or description"
    )]
    async fn update_address_list_entry(
        &self,
        Parameters(request): Parameters<UpdateEntryRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("update_address_list_entry", request.to_call())
            .await
    }

    #[tool(
        name = "delete_address_list_entry",
        description = "Delete a cheat table record selected by id, index or description"
    )]
    async fn delete_address_list_entry(
        &self,
        Parameters(selector): Parameters<EntrySelector>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("delete_address_list_entry", selector.to_delete_call())
            .await
    }

    #[tool(
        name = "clear_address_list",
        description = "Remove every record from the cheat table"
    )]
    async fn clear_address_list(&self) -> Result<CallToolResult, ErrorData> {
        self.forward(
            "clear_address_list",
            ApiCall::post(Endpoint::AddressListClear, json!({})),
        )
        .await
    }
}
