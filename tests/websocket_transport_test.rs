// ABOUTME: WebSocket transport tests: framing, id preservation, and context purity
// ABOUTME: Drives a live loopback listener with tokio-tungstenite clients
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

mod common;

use common::{init_test_logging, make_project};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use srrd_mcp_server::config::{FeatureFlags, ServerConfig};
use srrd_mcp_server::mcp::resources::ServerResources;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_tungstenite::tungstenite::Message;

struct WsFixture {
    resources: Arc<ServerResources>,
    port: u16,
    _home: TempDir,
    server: tokio::task::JoinHandle<()>,
}

impl Drop for WsFixture {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn start_ws_server(port: u16) -> WsFixture {
    init_test_logging();
    let home = TempDir::new().unwrap();
    let config = ServerConfig {
        mcp_port: port,
        features: FeatureFlags::default(),
        global_home_project: home.path().join("home-project"),
        ..ServerConfig::default()
    };
    let resources = ServerResources::new(config).unwrap();
    let serve_resources = resources.clone();
    let server = tokio::spawn(async move {
        let _ = srrd_mcp_server::websocket::serve(serve_resources).await;
    });

    // Wait for the listener to accept connections.
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    WsFixture {
        resources,
        port,
        _home: home,
        server,
    }
}

type WsClient = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn connect(port: u16) -> WsClient {
    let (client, _) = tokio_tungstenite::connect_async(format!("ws://127.0.0.1:{port}"))
        .await
        .expect("connect");
    client
}

async fn roundtrip(client: &mut WsClient, payload: Value) -> Value {
    client
        .send(Message::Text(payload.to_string()))
        .await
        .expect("send");
    loop {
        match client.next().await.expect("frame").expect("ok frame") {
            Message::Text(text) => return serde_json::from_str(&text).expect("json reply"),
            Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

#[tokio::test]
async fn websocket_speaks_the_same_jsonrpc_surface() {
    let fixture = start_ws_server(18765).await;
    let mut client = connect(fixture.port).await;

    let init = roundtrip(
        &mut client,
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
    )
    .await;
    assert_eq!(init["id"], 1);
    assert_eq!(init["result"]["serverInfo"]["name"], "srrd-builder-mcp");

    let list = roundtrip(
        &mut client,
        json!({ "jsonrpc": "2.0", "id": "list-1", "method": "tools/list" }),
    )
    .await;
    assert_eq!(list["id"], "list-1");
    assert!(!list["result"]["tools"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn replies_keep_request_order_on_one_connection() {
    let fixture = start_ws_server(18766).await;
    let mut client = connect(fixture.port).await;

    for id in 1..=5 {
        client
            .send(Message::Text(
                json!({ "jsonrpc": "2.0", "id": id, "method": "ping" }).to_string(),
            ))
            .await
            .unwrap();
    }
    for expected in 1..=5 {
        let reply = loop {
            match client.next().await.unwrap().unwrap() {
                Message::Text(text) => break serde_json::from_str::<Value>(&text).unwrap(),
                _ => continue,
            }
        };
        assert_eq!(reply["id"], expected);
    }
}

#[tokio::test]
async fn concurrent_connections_have_disjoint_context_state() {
    let fixture = start_ws_server(18767).await;
    let project_a = make_project("alpha", "physics");
    let project_b = make_project("beta", "biology");

    let mut client_a = connect(fixture.port).await;
    let mut client_b = connect(fixture.port).await;

    // Each connection switches its own override to a different project.
    let switch_a = roundtrip(
        &mut client_a,
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": { "name": "switch_project_context",
                        "arguments": { "target_path": project_a.path().display().to_string() } }
        }),
    )
    .await;
    assert!(switch_a.get("error").is_none());
    let switch_b = roundtrip(
        &mut client_b,
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": { "name": "switch_project_context",
                        "arguments": { "target_path": project_b.path().display().to_string() } }
        }),
    )
    .await;
    assert!(switch_b.get("error").is_none());

    // Context-required calls on each connection land in disjoint stores.
    let call = |tool: &str| {
        json!({
            "jsonrpc": "2.0", "id": 2, "method": "tools/call",
            "params": { "name": tool, "arguments": {} }
        })
    };
    let reply_a = roundtrip(&mut client_a, call("get_research_progress")).await;
    assert!(reply_a.get("error").is_none());
    let reply_b = roundtrip(&mut client_b, call("get_research_progress")).await;
    assert!(reply_b.get("error").is_none());

    let store_a = fixture.resources.stores.get_or_open(project_a.path()).await.unwrap();
    let store_b = fixture.resources.stores.get_or_open(project_b.path()).await.unwrap();
    let names_a = store_a.distinct_tool_names().await.unwrap();
    let names_b = store_b.distinct_tool_names().await.unwrap();

    assert!(names_a.contains(&"get_research_progress".to_owned()));
    assert!(names_b.contains(&"get_research_progress".to_owned()));
    // Neither store saw the other connection's switch target.
    assert_eq!(store_a.total_invocations().await.unwrap(), 1);
    assert_eq!(store_b.total_invocations().await.unwrap(), 1);
}

#[tokio::test]
async fn fresh_connections_inherit_no_override() {
    let fixture = start_ws_server(18768).await;
    let project = make_project("gamma", "chemistry");

    let mut first = connect(fixture.port).await;
    let switched = roundtrip(
        &mut first,
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": { "name": "switch_project_context",
                        "arguments": { "target_path": project.path().display().to_string() } }
        }),
    )
    .await;
    assert!(switched.get("error").is_none());

    // A new connection starts with an empty override slot.
    let mut second = connect(fixture.port).await;
    let reply = roundtrip(
        &mut second,
        json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": { "name": "get_research_progress", "arguments": {} }
        }),
    )
    .await;
    assert_eq!(reply["error"]["data"]["kind"], "context_missing");
}

#[tokio::test]
async fn malformed_ws_frame_gets_a_parse_error_reply() {
    let fixture = start_ws_server(18769).await;
    let mut client = connect(fixture.port).await;

    client
        .send(Message::Text("{broken".to_owned()))
        .await
        .unwrap();
    let reply = loop {
        match client.next().await.unwrap().unwrap() {
            Message::Text(text) => break serde_json::from_str::<Value>(&text).unwrap(),
            _ => continue,
        }
    };
    assert_eq!(reply["error"]["code"], -32700);
}
