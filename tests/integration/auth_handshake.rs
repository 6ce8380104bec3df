use std::{
    process::{Command as StdCommand, Stdio},
    time::Duration,
};

use anyhow::Result;
use rmcp::{model::ClientInfo, serve_client};
use serde_json::Value;
use tokio::{process::Command, time::timeout};

use crate::common::{fixture, scrub_env, spawn_server_process, ChildIoBridge, BINARY_PATH};

fn launch_with(config: &str, token: Option<&str>) -> std::process::Output {
    let mut command = StdCommand::new(BINARY_PATH);
    command
        .env_remove("MCP_SHARED_TOKEN")
        .env_remove("MCP_HOST")
        .env_remove("MCP_PORT")
        .env("MCP_CONFIG_PATH", fixture(config))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(token) = token {
        command.env("MCP_SHARED_TOKEN", token);
    }
    command.output().expect("process should start")
}

fn stderr_code(output: &std::process::Output) -> Option<String> {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .find_map(|value| {
            value
                .get("data")
                .and_then(|data| data.get("code"))
                .and_then(Value::as_str)
                .map(String::from)
        })
}

#[test]
fn token_mismatch_causes_auth_token_mismatch_exit() {
    let output = launch_with(
        "tests/fixtures/config_token_mismatch.toml",
        Some("wrong-token-000000"),
    );
    assert_eq!(
        output.status.code(),
        Some(42),
        "AUTH_TOKEN_MISMATCH exit code (42) expected"
    );
    assert_eq!(stderr_code(&output).as_deref(), Some("AUTH_TOKEN_MISMATCH"));
}

#[test]
fn missing_token_causes_mcp_token_required_exit() {
    let output = launch_with("tests/fixtures/config_valid.toml", None);
    assert_eq!(
        output.status.code(),
        Some(43),
        "MCP_TOKEN_REQUIRED exit code (43) expected"
    );
    assert_eq!(stderr_code(&output).as_deref(), Some("MCP_TOKEN_REQUIRED"));
}

#[tokio::test]
async fn matching_token_allows_handshake() -> Result<()> {
    let (mut child, transport, stderr_task) = spawn_server_process().await?;
    let client = serve_client(ClientInfo::default(), transport).await?;
    let list = client.list_tools(None).await?;
    assert!(
        list.tools
            .iter()
            .any(|tool| tool.name.as_ref() == "open_process"),
        "list_tools should include open_process: {:?}",
        list.tools
    );
    client.cancel().await?;

    let status = timeout(Duration::from_secs(5), child.wait()).await??;
    assert!(status.success(), "expected clean server shutdown");
    if let Some(handle) = stderr_task {
        let _ = handle.await;
    }
    Ok(())
}

#[tokio::test]
async fn config_without_auth_section_accepts_any_client() -> Result<()> {
    let mut command = Command::new(BINARY_PATH);
    scrub_env(&mut command)
        .env(
            "MCP_CONFIG_PATH",
            fixture("tests/fixtures/config_no_auth.toml"),
        )
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    let mut child = command.spawn()?;
    let stdout = child.stdout.take().expect("child stdout");
    let stdin = child.stdin.take().expect("child stdin");

    let client = serve_client(ClientInfo::default(), ChildIoBridge::new(stdout, stdin)).await?;
    let list = client.list_tools(None).await?;
    assert_eq!(list.tools.len(), 54);
    client.cancel().await?;

    let status = timeout(Duration::from_secs(5), child.wait()).await??;
    assert!(status.success(), "expected clean server shutdown");
    Ok(())
}
