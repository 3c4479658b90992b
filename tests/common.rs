// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides project fixtures, server resources, and dispatcher helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors
#![allow(dead_code)]

//! Shared test utilities for `srrd_mcp_server` integration tests.

use serde_json::{json, Value};
use srrd_mcp_server::config::{FeatureFlags, ServerConfig};
use srrd_mcp_server::jsonrpc::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use srrd_mcp_server::mcp::request_processor::McpRequestProcessor;
use srrd_mcp_server::mcp::resources::ServerResources;
use std::path::Path;
use std::sync::{Arc, Once};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process).
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        srrd_mcp_server::logging::init(
            srrd_mcp_server::config::LogLevel::Off,
            srrd_mcp_server::logging::LogFormat::Pretty,
        );
    });
}

/// A server fixture whose home project lives in a throwaway directory.
pub struct TestServer {
    pub resources: Arc<ServerResources>,
    pub processor: McpRequestProcessor,
    _home: TempDir,
}

/// Build server resources with the given capabilities and a temp home
/// project, plus a dispatcher with fresh connection state.
pub fn test_server(latex: bool, vector_db: bool) -> TestServer {
    init_test_logging();
    let home = TempDir::new().expect("temp home");
    let config = ServerConfig {
        features: FeatureFlags { latex, vector_db },
        global_home_project: home.path().join("home-project"),
        ..ServerConfig::default()
    };
    let resources = ServerResources::new(config).expect("resources");
    TestServer {
        processor: McpRequestProcessor::new(resources.clone()),
        resources,
        _home: home,
    }
}

/// Create a temp directory initialized as a research project.
pub fn make_project(name: &str, domain: &str) -> TempDir {
    let dir = TempDir::new().expect("temp project");
    let marker = dir.path().join(".srrd");
    std::fs::create_dir_all(&marker).expect("marker dir");
    std::fs::write(
        marker.join("config.json"),
        json!({ "name": name, "domain": domain }).to_string(),
    )
    .expect("config.json");
    dir
}

/// Build a JSON-RPC request with a numeric id.
pub fn request(id: i64, method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.to_owned(),
        method: method.to_owned(),
        params: Some(params),
        id: Some(Value::from(id)),
    }
}

/// Dispatch a `tools/call` and return the reply.
pub async fn call_tool(
    server: &TestServer,
    id: i64,
    tool: &str,
    arguments: Value,
) -> JsonRpcResponse {
    let req = request(id, "tools/call", json!({ "name": tool, "arguments": arguments }));
    server
        .processor
        .handle_request(req)
        .await
        .expect("tools/call always gets a reply when an id is present")
}

/// Arguments map pointing a call at an explicit project.
pub fn project_args(project: &Path, mut extra: Value) -> Value {
    let map = extra.as_object_mut().expect("extra must be an object");
    map.insert(
        "project_path".to_owned(),
        Value::String(project.display().to_string()),
    );
    extra
}

/// Count tool_usage rows for a project through its store.
pub async fn usage_count(server: &TestServer, project: &Path) -> i64 {
    let store = server
        .resources
        .stores
        .get_or_open(project)
        .await
        .expect("store");
    store.total_invocations().await.expect("count")
}

/// Extract the error kind string from an error reply.
pub fn error_kind(response: &JsonRpcResponse) -> String {
    response
        .error
        .as_ref()
        .and_then(|e| e.data.as_ref())
        .and_then(|d| d.get("kind"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Extract the first JSON content item from a successful tools/call reply.
pub fn json_content(response: &JsonRpcResponse) -> Value {
    let result = response.result.as_ref().expect("success result");
    result["content"][0]["json"].clone()
}

/// Names listed by a tools/list reply.
pub async fn listed_tools(server: &TestServer) -> Vec<String> {
    let reply = server
        .processor
        .handle_request(request(99, "tools/list", json!({})))
        .await
        .expect("tools/list reply");
    reply.result.expect("result")["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .map(|t| t["name"].as_str().unwrap_or_default().to_owned())
        .collect()
}
