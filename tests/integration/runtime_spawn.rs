use std::{
    collections::BTreeSet,
    process::{Command as StdCommand, Stdio},
    time::Duration,
};

use anyhow::Result;
use cheat_engine_mcp::tools::catalog;
use rmcp::{model::ClientInfo, serve_client};
use tokio::time::timeout;

use crate::common::{fixture, spawn_server_process, BINARY_PATH, VALID_TOKEN};

#[tokio::test]
async fn inspector_style_spawn_lists_every_documented_tool() -> Result<()> {
    let (mut child, transport, stderr_task) = spawn_server_process().await?;

    let client = serve_client(ClientInfo::default(), transport).await?;
    let list = client.list_tools(None).await?;
    assert_eq!(list.tools.len(), 54, "{:?}", list.tools);

    let listed: BTreeSet<String> = list.tools.iter().map(|tool| tool.name.to_string()).collect();
    let documented: BTreeSet<String> = catalog::all_tool_names().map(String::from).collect();
    assert_eq!(listed, documented);

    let info = client.peer_info().and_then(|info| info.instructions.clone());
    assert!(
        info.as_deref()
            .is_some_and(|text| text.contains("/api/cheatengine")),
        "instructions should name the API root: {info:?}"
    );

    client.cancel().await?;
    let status = timeout(Duration::from_secs(5), child.wait()).await??;
    assert!(
        status.success(),
        "server should exit cleanly but exit status was {status:?}"
    );
    if let Some(handle) = stderr_task {
        let _ = handle.await;
    }
    Ok(())
}

#[test]
fn direct_execution_requires_mcp_client() {
    use std::io::IsTerminal;
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        eprintln!("Skipping MCP_CLIENT_REQUIRED test because stdio is not a TTY");
        return;
    }
    let status = StdCommand::new(BINARY_PATH)
        .env(
            "MCP_CONFIG_PATH",
            fixture("tests/fixtures/config_valid.toml"),
        )
        .env("MCP_SHARED_TOKEN", VALID_TOKEN)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .stdin(Stdio::inherit())
        .status()
        .expect("process should start");
    assert_eq!(
        status.code(),
        Some(44),
        "MCP_CLIENT_REQUIRED exit code (44) expected, got {status:?}"
    );
}

#[test]
fn explicit_config_path_must_exist() {
    let output = StdCommand::new(BINARY_PATH)
        .env_remove("MCP_SHARED_TOKEN")
        .env("MCP_CONFIG_PATH", fixture("tests/fixtures/does_not_exist.toml"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("process should start");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn invalid_config_field_fails_startup() {
    let output = StdCommand::new(BINARY_PATH)
        .env_remove("MCP_SHARED_TOKEN")
        .env_remove("MCP_PORT")
        .env(
            "MCP_CONFIG_PATH",
            fixture("tests/fixtures/config_invalid_port.toml"),
        )
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("process should start");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cheat_engine.port"), "{stderr}");
}
