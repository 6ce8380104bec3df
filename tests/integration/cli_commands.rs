use std::process::Stdio;

use anyhow::Result;
use serde_json::{json, Value};
use tokio::process::Command;

use crate::common::{fixture, scrub_env, StubApi, BINARY_PATH};

struct CliOutput {
    code: Option<i32>,
    stdout: Value,
    stderr: String,
}

async fn run_cli(args: &[&str], envs: &[(&str, String)]) -> Result<CliOutput> {
    let mut command = Command::new(BINARY_PATH);
    scrub_env(&mut command)
        .env(
            "MCP_CONFIG_PATH",
            fixture("tests/fixtures/config_no_auth.toml"),
        )
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in envs {
        command.env(key, value);
    }
    let output = command.output().await?;
    Ok(CliOutput {
        code: output.status.code(),
        stdout: serde_json::from_slice(&output.stdout).unwrap_or(Value::Null),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn stub_env(stub: &StubApi) -> Vec<(&'static str, String)> {
    vec![
        ("MCP_HOST", "127.0.0.1".to_string()),
        ("MCP_PORT", stub.addr.port().to_string()),
    ]
}

#[tokio::test]
async fn tools_command_prints_category_catalog() -> Result<()> {
    let output = run_cli(&["tools", "--category", "memory"], &[]).await?;
    assert_eq!(output.code, Some(0));
    let payload = output.stdout;
    assert_eq!(payload["tool_count"], json!(30));
    let tools = payload["tools"].as_array().expect("tools array");
    assert!(tools.iter().all(|tool| tool["category"] == "memory"));
    assert_eq!(tools[0]["name"], "read_bytes");
    assert!(tools[0]["input_schema"]["properties"]["byte_count"].is_object());
    Ok(())
}

#[tokio::test]
async fn unknown_category_fails() -> Result<()> {
    let output = run_cli(&["tools", "--category", "kernel"], &[]).await?;
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("kernel"), "{}", output.stderr);
    Ok(())
}

#[tokio::test]
async fn health_command_honours_host_and_port_overrides() -> Result<()> {
    let stub = StubApi::ok(json!({
        "status": "healthy",
        "server": "Cheat Engine REST",
        "version": "1.0.0"
    }))
    .await?;

    let output = run_cli(&["health"], &stub_env(&stub)).await?;

    assert_eq!(output.code, Some(0));
    let payload = output.stdout;
    assert_eq!(payload["status"], "healthy");
    assert_eq!(payload["response"]["version"], "1.0.0");
    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/cheatengine/health");
    Ok(())
}

#[tokio::test]
async fn unhealthy_plugin_fails_health_command() -> Result<()> {
    let stub = StubApi::ok(json!({ "Success": false, "Error": "Lua engine not ready" })).await?;

    let output = run_cli(&["health"], &stub_env(&stub)).await?;

    assert_eq!(output.code, Some(1));
    assert_eq!(output.stdout, Value::Null);
    assert!(output.stderr.contains("unhealthy"), "{}", output.stderr);
    assert!(output.stderr.contains("Lua engine not ready"), "{}", output.stderr);
    Ok(())
}

#[tokio::test]
async fn tools_command_reports_routes() -> Result<()> {
    let output = run_cli(&["tools", "--category", "scan"], &[]).await?;
    assert_eq!(output.code, Some(0));
    let tools = output.stdout["tools"].as_array().expect("tools array").clone();
    let aob = tools
        .iter()
        .find(|tool| tool["name"] == "aob_scan")
        .expect("aob_scan listed");
    assert_eq!(aob["method"], "POST");
    assert_eq!(aob["endpoint"], "aob-scan");
    Ok(())
}
