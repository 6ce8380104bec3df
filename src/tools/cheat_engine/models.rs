//! Typed views of the plugin responses this crate inspects itself.
//!
//! Everything else is forwarded as raw JSON. The plugin has shipped both
//! PascalCase and camelCase field names, so both are accepted on input.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `Success` / `Error` envelope shared by every plugin response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse {
    #[serde(rename = "Success", alias = "success", default)]
    pub success: Option<bool>,
    #[serde(rename = "Error", alias = "error", default)]
    pub error: Option<String>,
}

impl BaseResponse {
    /// Read the envelope fields straight from the body's map, so an oddly typed
    /// sibling field cannot hide `Success: false`. Non-objects have no envelope.
    pub fn from_value(body: &Value) -> Self {
        let Value::Object(map) = body else {
            return Self::default();
        };
        let field = |pascal: &str, camel: &str| map.get(pascal).or_else(|| map.get(camel));
        let success = field("Success", "success").and_then(Value::as_bool);
        let error = field("Error", "error").and_then(|error| match error {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        });
        Self { success, error }
    }

    /// The plugin explicitly reported a failure.
    pub fn reported_failure(&self) -> bool {
        self.success == Some(false)
    }
}

/// Response of the `health` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    #[serde(rename = "Success", alias = "success", default)]
    pub success: Option<bool>,
    #[serde(rename = "Error", alias = "error", default)]
    pub error: Option<String>,
    #[serde(alias = "Status", default)]
    pub status: Option<String>,
    #[serde(alias = "Server", default)]
    pub server: Option<String>,
    #[serde(alias = "Version", default)]
    pub version: Option<String>,
    #[serde(alias = "Timestamp", default)]
    pub timestamp: Option<String>,
}

impl HealthResponse {
    pub fn from_value(body: Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }

    pub fn is_healthy(&self) -> bool {
        if self.success == Some(false) {
            return false;
        }
        match self.status.as_deref() {
            Some(status) => {
                status.eq_ignore_ascii_case("healthy") || status.eq_ignore_ascii_case("ok")
            }
            None => self.success == Some(true),
        }
    }
}

/// Locally assembled answer of `get_api_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ApiInfoResponse {
    pub base_url: String,
    pub api_root: String,
    pub swagger_ui: String,
    pub description: String,
}
