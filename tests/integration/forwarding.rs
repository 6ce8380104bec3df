use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};

use crate::common::{
    call, closed_port, config_for_port, connect_in_process, error_field, RecordedRequest, StubApi,
};

#[tokio::test]
async fn read_integer_posts_documented_body() -> Result<()> {
    let stub = StubApi::ok(json!({ "Success": true, "Value": 1337 })).await?;
    let client = connect_in_process(stub.config()).await?;

    let result = call(
        &client,
        "read_integer",
        json!({ "address": "0x00401000", "signed": true }),
    )
    .await?;

    assert_eq!(
        result.structured_content,
        Some(json!({ "Success": true, "Value": 1337 }))
    );
    assert_ne!(result.is_error, Some(true));
    assert_eq!(
        stub.requests(),
        vec![RecordedRequest {
            method: "POST".into(),
            path: "/api/cheatengine/read-memory".into(),
            body: Some(json!({
                "Address": "0x00401000",
                "DataType": "integer",
                "Signed": true
            })),
        }]
    );

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn local_write_sends_suffixed_data_type() -> Result<()> {
    let stub = StubApi::ok(json!({ "Success": true })).await?;
    let client = connect_in_process(stub.config()).await?;

    call(
        &client,
        "write_float_local",
        json!({ "address": "0x10", "value": 1.5 }),
    )
    .await?;

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/cheatengine/write-memory");
    assert_eq!(
        requests[0].body,
        Some(json!({ "Address": "0x10", "DataType": "floatlocal", "Value": 1.5 }))
    );

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn process_list_is_a_plain_get() -> Result<()> {
    let processes = json!({
        "Success": true,
        "Processes": [{ "ProcessId": 4, "ProcessName": "System" }]
    });
    let stub = StubApi::ok(processes.clone()).await?;
    let client = connect_in_process(stub.config()).await?;

    let result = call(&client, "get_process_list", json!({})).await?;

    assert_eq!(result.structured_content, Some(processes));
    assert_eq!(
        stub.requests(),
        vec![RecordedRequest {
            method: "GET".into(),
            path: "/api/cheatengine/process-list".into(),
            body: None,
        }]
    );

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn memscan_reset_posts_without_body() -> Result<()> {
    let stub = StubApi::ok(json!({ "Success": true })).await?;
    let client = connect_in_process(stub.config()).await?;

    call(&client, "memscan_reset", json!({})).await?;

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/cheatengine/memscan-reset");
    assert_eq!(requests[0].body, None);

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn address_list_add_uses_camel_case_and_numeric_type() -> Result<()> {
    let stub = StubApi::ok(json!({ "success": true, "record": { "id": 7 } })).await?;
    let client = connect_in_process(stub.config()).await?;

    call(
        &client,
        "add_address_list_entry",
        json!({ "description": "Health", "address": "game.exe+1F00", "var_type": "vtSingle", "value": "100" }),
    )
    .await?;

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/cheatengine/addresslist/add");
    assert_eq!(
        requests[0].body,
        Some(json!({
            "description": "Health",
            "address": "game.exe+1F00",
            "varType": 4,
            "value": "100"
        }))
    );

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn reported_failure_is_passed_through_as_error_result() -> Result<()> {
    let failure = json!({ "Success": false, "Error": "No process is opened" });
    let stub = StubApi::ok(failure.clone()).await?;
    let client = connect_in_process(stub.config()).await?;

    let result = call(&client, "get_thread_list", json!({})).await?;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(result.structured_content, Some(failure));

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn http_error_maps_to_api_http_error() -> Result<()> {
    let stub = StubApi::start(500, json!({ "message": "plugin crashed" })).await?;
    let client = connect_in_process(stub.config()).await?;

    let err = call(&client, "get_process_status", json!({}))
        .await
        .expect_err("HTTP 500 must surface as an MCP error");

    assert_eq!(error_field(&err, "code").as_deref(), Some("api_http_error"));
    assert_eq!(error_field(&err, "retryable").as_deref(), Some("true"));
    assert_eq!(
        error_field(&err, "tool").as_deref(),
        Some("get_process_status")
    );

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn unreachable_api_maps_to_api_unreachable() -> Result<()> {
    let client = connect_in_process(config_for_port(closed_port()?)).await?;

    let err = call(&client, "get_health", json!({}))
        .await
        .expect_err("closed port must surface as an MCP error");

    assert_eq!(
        error_field(&err, "code").as_deref(),
        Some("api_unreachable")
    );
    assert_eq!(error_field(&err, "origin").as_deref(), Some("bridge"));

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_api() -> Result<()> {
    let stub = StubApi::ok(json!({ "Success": true })).await?;
    let client = connect_in_process(stub.config()).await?;

    let err = call(
        &client,
        "read_bytes",
        json!({ "address": "0x1000", "byte_count": 0 }),
    )
    .await
    .expect_err("zero-length read must be rejected");
    assert_eq!(
        error_field(&err, "code").as_deref(),
        Some("invalid_request")
    );

    let err = call(
        &client,
        "memscan",
        json!({ "scan_option": "soExactValue", "var_type": "vtDword" }),
    )
    .await
    .expect_err("exact scan without input1 must be rejected");
    assert_eq!(
        error_field(&err, "code").as_deref(),
        Some("invalid_request")
    );

    let err = call(&client, "delete_address_list_entry", json!({}))
        .await
        .expect_err("delete without selector must be rejected");
    assert_eq!(
        error_field(&err, "code").as_deref(),
        Some("invalid_request")
    );

    assert!(stub.requests().is_empty(), "{:?}", stub.requests());

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn api_info_is_answered_locally() -> Result<()> {
    let stub = StubApi::ok(json!({ "Success": true })).await?;
    let client = connect_in_process(stub.config()).await?;

    let result = call(&client, "get_api_info", json!({})).await?;
    let info = result.structured_content.expect("structured api info");
    let base_url = format!("http://127.0.0.1:{}", stub.addr.port());
    assert_eq!(info["base_url"], json!(base_url));
    assert_eq!(info["swagger_ui"], json!(format!("{base_url}/swagger")));
    assert!(stub.requests().is_empty());

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn non_string_error_still_marks_failure() -> Result<()> {
    let failure = json!({ "Success": false, "Error": 5 });
    let stub = StubApi::ok(failure.clone()).await?;
    let client = connect_in_process(stub.config()).await?;

    let result = call(&client, "get_process_status", json!({})).await?;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(result.structured_content, Some(failure));

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn slow_api_maps_to_api_timeout() -> Result<()> {
    let stub = StubApi::slow(Duration::from_secs(3), json!({ "Success": true })).await?;
    let mut config = stub.config();
    config.cheat_engine.timeout_secs = 1;
    let client = connect_in_process(config).await?;

    let err = call(
        &client,
        "memscan",
        json!({ "scan_option": "soUnknownValue", "var_type": "vtDword" }),
    )
    .await
    .expect_err("a reply slower than timeout_secs must surface as an MCP error");

    assert_eq!(error_field(&err, "code").as_deref(), Some("api_timeout"));
    assert_eq!(error_field(&err, "retryable").as_deref(), Some("true"));
    assert_eq!(error_field(&err, "origin").as_deref(), Some("bridge"));
    let details: Value = serde_json::from_str(&error_field(&err, "details").unwrap_or_default())?;
    assert_eq!(details["timeout_secs"], json!(1));
    assert_eq!(details["endpoint"], json!("memscan"));
    assert_eq!(stub.requests().len(), 1);

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn non_json_body_maps_to_api_invalid_response() -> Result<()> {
    let stub = StubApi::text("<html><body>It works!</body></html>").await?;
    let client = connect_in_process(stub.config()).await?;

    let err = call(&client, "get_health", json!({}))
        .await
        .expect_err("an HTML page must surface as an MCP error");

    assert_eq!(
        error_field(&err, "code").as_deref(),
        Some("api_invalid_response")
    );
    assert_eq!(error_field(&err, "retryable").as_deref(), Some("false"));
    assert_eq!(error_field(&err, "origin").as_deref(), Some("api"));

    client.cancel().await?;
    Ok(())
}
