//! End-to-end HTTP tests against a real A2A server: unary send/get, an
//! unknown task id, cancel refusal, and a malformed request body.

mod common;

use common::{spawn_server, EchoAgent};
use serde_json::json;

async fn post_rpc(base_url: &str, body: serde_json::Value) -> (reqwest::StatusCode, serde_json::Value) {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base_url}/a2a"))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    let json = response.json::<serde_json::Value>().await.unwrap();
    (status, json)
}

/// A sent task can immediately be fetched back by id with its history intact.
#[tokio::test]
async fn unary_send_then_get() {
    let base_url = spawn_server(std::sync::Arc::new(EchoAgent)).await;

    let (status, body) = post_rpc(
        &base_url,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tasks/send",
            "params": {
                "id": "t-1",
                "sessionId": "s",
                "message": { "role": "user", "parts": [{"type": "text", "text": "hi"}] }
            }
        }),
    )
    .await;

    assert!(status.is_success());
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["result"]["id"], json!("t-1"));
    assert_eq!(body["result"]["history"].as_array().unwrap().len(), 1);

    let (status, body) = post_rpc(
        &base_url,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tasks/get",
            "params": { "id": "t-1", "historyLength": 10 }
        }),
    )
    .await;

    assert!(status.is_success());
    assert_eq!(body["id"], json!(2));
    assert_eq!(body["result"]["history"].as_array().unwrap().len(), 1);
}

/// Fetching an id that was never sent fails with `TaskNotFound`.
#[tokio::test]
async fn unknown_task_returns_task_not_found() {
    let base_url = spawn_server(std::sync::Arc::new(EchoAgent)).await;

    let (_status, body) = post_rpc(
        &base_url,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tasks/get",
            "params": { "id": "missing" }
        }),
    )
    .await;

    assert_eq!(body["id"], json!(3));
    assert_eq!(body["error"]["code"], json!(a2a_rs::error::TASK_NOT_FOUND));
}

/// `InMemoryTaskManager` always refuses to cancel, even a task that exists.
#[tokio::test]
async fn cancel_known_task_is_refused() {
    let base_url = spawn_server(std::sync::Arc::new(EchoAgent)).await;

    post_rpc(
        &base_url,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tasks/send",
            "params": {
                "id": "t-1",
                "sessionId": "s",
                "message": { "role": "user", "parts": [{"type": "text", "text": "hi"}] }
            }
        }),
    )
    .await;

    let (_status, body) = post_rpc(
        &base_url,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tasks/cancel",
            "params": { "id": "t-1" }
        }),
    )
    .await;

    assert_eq!(body["id"], json!(4));
    assert_eq!(body["error"]["code"], json!(a2a_rs::error::TASK_NOT_CANCELABLE));
}

/// A body that isn't valid JSON fails with `ParseError` and a null id.
#[tokio::test]
async fn malformed_body_is_parse_error() {
    let base_url = spawn_server(std::sync::Arc::new(EchoAgent)).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base_url}/a2a"))
        .header("Content-Type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], json!(a2a_rs::error::PARSE_ERROR));
    assert_eq!(body["id"], serde_json::Value::Null);
}

/// Unknown method names fail closed as `InvalidRequest`, never a panic.
#[tokio::test]
async fn unknown_method_returns_invalid_request() {
    let base_url = spawn_server(std::sync::Arc::new(EchoAgent)).await;

    let (_status, body) = post_rpc(
        &base_url,
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "message/send",
            "params": {}
        }),
    )
    .await;

    assert_eq!(body["error"]["code"], json!(a2a_rs::error::INVALID_REQUEST));
}

/// Agent card discovery at the well-known path.
#[tokio::test]
async fn agent_card_is_served_at_well_known_path() {
    let base_url = spawn_server(std::sync::Arc::new(EchoAgent)).await;

    let response = reqwest::get(format!("{base_url}/.well-known/agent.json"))
        .await
        .unwrap();
    assert!(response.status().is_success());

    let card: a2a_rs::types::AgentCard = response.json().await.unwrap();
    assert_eq!(card.name, "Test Agent");
    assert!(card.capabilities.streaming);
}

/// Upsert semantics: resending the same task id appends to history rather
/// than resetting status to `submitted`.
#[tokio::test]
async fn resending_same_task_id_appends_history() {
    let base_url = spawn_server(std::sync::Arc::new(EchoAgent)).await;

    let send = |text: &'static str| {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tasks/send",
            "params": {
                "id": "t-1",
                "sessionId": "s",
                "message": { "role": "user", "parts": [{"type": "text", "text": text}] }
            }
        })
    };

    let (_status, first) = post_rpc(&base_url, send("first")).await;
    assert_eq!(first["result"]["status"]["state"], json!("completed"));

    let (_status, second) = post_rpc(&base_url, send("second")).await;
    // history grows: first user message, first agent status message,
    // second user message, second agent status message.
    assert!(second["result"]["history"].as_array().unwrap().len() > 1);
    assert_eq!(second["result"]["status"]["state"], json!("completed"));
}
