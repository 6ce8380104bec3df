//! Argument shapes shared by several tool categories.
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    client::{ApiCall, Endpoint},
    errors::{require_non_blank, RequestValidationError},
};

/// Input for tools that take nothing but an address.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddressRequest {
    /// Address expression: hex (`0x12345`), decimal, or a symbol such as `game.exe+1234`.
    pub address: String,
}

impl AddressRequest {
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        require_non_blank("address", &self.address)
    }

    /// POST `{Address}` to the given endpoint.
    pub fn to_call(&self, endpoint: Endpoint) -> Result<ApiCall, RequestValidationError> {
        self.validate()?;
        Ok(ApiCall::post(endpoint, json!({ "Address": self.address })))
    }
}

/// Input for tools that take a single piece of text.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TextRequest {
    pub text: String,
}

pub(crate) fn default_true() -> bool {
    true
}

/// Insert `value` under `key` only when it is present.
pub(crate) fn insert_some<T: Into<Value>>(body: &mut Value, key: &str, value: Option<T>) {
    if let (Some(value), Value::Object(map)) = (value, body) {
        map.insert(key.to_string(), value.into());
    }
}
