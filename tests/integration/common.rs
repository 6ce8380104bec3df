use std::{
    io,
    net::SocketAddr,
    path::PathBuf,
    process::Stdio,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use cheat_engine_mcp::server::{config::ServerConfig, runtime::CheatEngineServer};
use rmcp::{
    model::{CallToolRequestParam, CallToolResult, ClientInfo},
    service::{RunningService, ServiceError},
    serve_client, RoleClient, ServiceExt,
};
use serde_json::Value;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, ReadBuf},
    net::TcpListener,
    process::{Child, ChildStdin, ChildStdout, Command},
    task::JoinHandle,
};

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_cheat-engine-mcp");
pub const VALID_TOKEN: &str = "valid-token-123456";

pub type TestClient = RunningService<RoleClient, ClientInfo>;

/// Clear variables from the developer's shell that would change the child's config.
pub fn scrub_env(command: &mut Command) -> &mut Command {
    command
        .env_remove("MCP_SHARED_TOKEN")
        .env_remove("MCP_CONFIG_PATH")
        .env_remove("MCP_HOST")
        .env_remove("MCP_PORT")
}

pub async fn spawn_server_process() -> Result<(Child, ChildIoBridge, Option<JoinHandle<()>>)> {
    let mut command = Command::new(BINARY_PATH);
    scrub_env(&mut command)
        .env(
            "MCP_CONFIG_PATH",
            fixture("tests/fixtures/config_valid.toml"),
        )
        .env("MCP_SHARED_TOKEN", VALID_TOKEN)
        .stdout(Stdio::piped())
        .stdin(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn().context("failed to spawn server process")?;
    let stdout = child.stdout.take().context("child stdout")?;
    let stdin = child.stdin.take().context("child stdin")?;
    let bridge = ChildIoBridge::new(stdout, stdin);
    let stderr_handle = child.stderr.take().map(|mut stderr| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
        })
    });
    Ok((child, bridge, stderr_handle))
}

pub fn fixture(relative: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.join(relative).display().to_string()
}

/// One request as seen by the stub plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

/// What the stub answers to every request.
#[derive(Clone)]
enum Reply {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
    Delayed(Duration, Value),
}

#[derive(Clone)]
struct StubState {
    reply: Reply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Stand-in for the Cheat Engine REST plugin that answers every path the same way.
pub struct StubApi {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl StubApi {
    async fn serve(reply: Reply) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reply,
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(record).with_state(state);
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self {
            addr,
            requests,
            task,
        })
    }

    pub async fn start(status: u16, response: Value) -> Result<Self> {
        Self::serve(Reply::Json(StatusCode::from_u16(status)?, response)).await
    }

    pub async fn ok(response: Value) -> Result<Self> {
        Self::start(200, response).await
    }

    /// Answers 200 with a body that is not JSON.
    pub async fn text(body: &'static str) -> Result<Self> {
        Self::serve(Reply::Text(StatusCode::OK, body)).await
    }

    /// Answers only after `delay`.
    pub async fn slow(delay: Duration, response: Value) -> Result<Self> {
        Self::serve(Reply::Delayed(delay, response)).await
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Server config pointing at this stub.
    pub fn config(&self) -> ServerConfig {
        config_for_port(self.addr.port())
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            body,
        });
    }
    match state.reply {
        Reply::Json(status, value) => (status, Json(value)).into_response(),
        Reply::Text(status, text) => {
            (status, [(header::CONTENT_TYPE, "text/html")], text).into_response()
        }
        Reply::Delayed(delay, value) => {
            tokio::time::sleep(delay).await;
            Json(value).into_response()
        }
    }
}

pub fn config_for_port(port: u16) -> ServerConfig {
    let mut config = ServerConfig::defaults(PathBuf::from("tests/in-process.toml"));
    config.cheat_engine.host = "127.0.0.1".into();
    config.cheat_engine.port = port;
    config.cheat_engine.timeout_secs = 5;
    config
}

/// Port with nothing listening on it.
pub fn closed_port() -> Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// Serve a `CheatEngineServer` over an in-memory pipe and connect a client to it.
pub async fn connect_in_process(config: ServerConfig) -> Result<TestClient> {
    let server = CheatEngineServer::new(config, "integration test".into())?;
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    tokio::spawn(async move {
        if let Ok(running) = server.serve(server_io).await {
            let _ = running.waiting().await;
        }
    });
    Ok(serve_client(ClientInfo::default(), client_io).await?)
}

pub async fn call(
    client: &TestClient,
    tool: &'static str,
    arguments: Value,
) -> Result<CallToolResult, ServiceError> {
    client
        .call_tool(CallToolRequestParam {
            name: tool.into(),
            arguments: arguments.as_object().cloned(),
        })
        .await
}

/// `data.<key>` of an MCP error, as a string.
pub fn error_field(err: &ServiceError, key: &str) -> Option<String> {
    match err {
        ServiceError::McpError(data) => data
            .data
            .as_ref()
            .and_then(|value| value.get(key))
            .map(|value| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            }),
        _ => None,
    }
}

pub struct ChildIoBridge {
    stdout: ChildStdout,
    stdin: ChildStdin,
}

impl ChildIoBridge {
    pub fn new(stdout: ChildStdout, stdin: ChildStdin) -> Self {
        Self { stdout, stdin }
    }
}

impl AsyncRead for ChildIoBridge {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdout).poll_read(cx, buf)
    }
}

impl AsyncWrite for ChildIoBridge {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        data: &[u8],
    ) -> std::task::Poll<io::Result<usize>> {
        std::pin::Pin::new(&mut self.stdin).poll_write(cx, data)
    }

    fn poll_flush(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_shutdown(cx)
    }
}
