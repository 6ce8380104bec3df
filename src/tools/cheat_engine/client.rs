//! HTTP client for the Cheat Engine REST plugin.
use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::{lib::errors::BridgeError, server::config::CheatEngineConfig};

use super::models::HealthResponse;

/// REST endpoints exposed by the plugin, relative to the API root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ExecuteLua,
    ProcessList,
    OpenProcess,
    ThreadList,
    ProcessStatus,
    ReadMemory,
    WriteMemory,
    GetAddressSafe,
    GetNameFromAddress,
    InModule,
    InSystemModule,
    Convert,
    AobScan,
    Disassemble,
    MemScan,
    MemScanReset,
    Health,
    AddressList,
    AddressListAdd,
    AddressListUpdate,
    AddressListDelete,
    AddressListClear,
}

impl Endpoint {
    pub const ALL: [Endpoint; 22] = [
        Endpoint::ExecuteLua,
        Endpoint::ProcessList,
        Endpoint::OpenProcess,
        Endpoint::ThreadList,
        Endpoint::ProcessStatus,
        Endpoint::ReadMemory,
        Endpoint::WriteMemory,
        Endpoint::GetAddressSafe,
        Endpoint::GetNameFromAddress,
        Endpoint::InModule,
        Endpoint::InSystemModule,
        Endpoint::Convert,
        Endpoint::AobScan,
        Endpoint::Disassemble,
        Endpoint::MemScan,
        Endpoint::MemScanReset,
        Endpoint::Health,
        Endpoint::AddressList,
        Endpoint::AddressListAdd,
        Endpoint::AddressListUpdate,
        Endpoint::AddressListDelete,
        Endpoint::AddressListClear,
    ];

    pub const fn path(&self) -> &'static str {
        match self {
            Endpoint::ExecuteLua => "execute-lua",
            Endpoint::ProcessList => "process-list",
            Endpoint::OpenProcess => "open-process",
            Endpoint::ThreadList => "thread-list",
            Endpoint::ProcessStatus => "process-status",
            Endpoint::ReadMemory => "read-memory",
            Endpoint::WriteMemory => "write-memory",
            Endpoint::GetAddressSafe => "get-address-safe",
            Endpoint::GetNameFromAddress => "get-name-from-address",
            Endpoint::InModule => "in-module",
            Endpoint::InSystemModule => "in-system-module",
            Endpoint::Convert => "convert",
            Endpoint::AobScan => "aob-scan",
            Endpoint::Disassemble => "disassemble",
            Endpoint::MemScan => "memscan",
            Endpoint::MemScanReset => "memscan-reset",
            Endpoint::Health => "health",
            Endpoint::AddressList => "addresslist",
            Endpoint::AddressListAdd => "addresslist/add",
            Endpoint::AddressListUpdate => "addresslist/update",
            Endpoint::AddressListDelete => "addresslist/delete",
            Endpoint::AddressListClear => "addresslist/clear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// One outbound request: method, endpoint and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: HttpMethod,
    pub endpoint: Endpoint,
    pub body: Option<Value>,
}

impl ApiCall {
    pub fn get(endpoint: Endpoint) -> Self {
        Self {
            method: HttpMethod::Get,
            endpoint,
            body: None,
        }
    }

    pub fn post(endpoint: Endpoint, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            endpoint,
            body: Some(body),
        }
    }

    /// POST without a request body.
    pub fn post_empty(endpoint: Endpoint) -> Self {
        Self {
            method: HttpMethod::Post,
            endpoint,
            body: None,
        }
    }
}

/// Thin wrapper around a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct CheatEngineClient {
    http: Client,
    api_root: String,
    timeout: Duration,
}

impl CheatEngineClient {
    pub fn new(config: &CheatEngineConfig) -> Result<Self, BridgeError> {
        let timeout = config.request_timeout();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| BridgeError::ClientBuild { source })?;
        Ok(Self {
            http,
            api_root: config.api_root(),
            timeout,
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.api_root, endpoint.path())
    }

    /// Send one request and return the decoded JSON body unchanged.
    pub async fn send(&self, call: &ApiCall) -> Result<Value, BridgeError> {
        let url = self.endpoint_url(call.endpoint);
        debug!(
            target: "cheat_engine_mcp::bridge",
            method = call.method.as_str(),
            url = %url,
            "Forwarding request to Cheat Engine"
        );

        let request = match call.method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };
        let request = match &call.body {
            Some(body) => request.json(body),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|source| self.transport_error(&url, source))?;
        let response = ensure_success(&url, response)?;
        response
            .json::<Value>()
            .await
            .map_err(|source| self.decode_error(&url, source))
    }

    /// Typed answer of the `health` endpoint.
    pub async fn health(&self) -> Result<HealthResponse, BridgeError> {
        let call = ApiCall::get(Endpoint::Health);
        let body = self.send(&call).await?;
        Ok(HealthResponse::from_value(body))
    }

    fn transport_error(&self, url: &str, source: reqwest::Error) -> BridgeError {
        if source.is_timeout() {
            return BridgeError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            };
        }
        BridgeError::Unreachable {
            url: url.to_string(),
            source,
        }
    }

    fn decode_error(&self, url: &str, source: reqwest::Error) -> BridgeError {
        if source.is_timeout() {
            return BridgeError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            };
        }
        BridgeError::InvalidResponse {
            url: url.to_string(),
            source,
        }
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response, BridgeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(BridgeError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
    })
}
