// ABOUTME: MCP protocol message handlers for initialize, ping, and tools/list
// ABOUTME: Version negotiation is tolerant; unsupported clients get the newest version
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # MCP Protocol Handlers
//!
//! Core protocol message handling shared by every transport.

use super::resources::ServerResources;
use super::schema::{
    InitializeRequest, InitializeResult, ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::constants::protocol;
use crate::errors::AppError;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// MCP protocol handlers
pub struct ProtocolHandler;

impl ProtocolHandler {
    /// Handle the `initialize` handshake.
    ///
    /// An empty params object is accepted; an unsupported client version is
    /// answered with the newest version this server speaks rather than an
    /// error, matching how permissive MCP hosts behave in practice.
    #[must_use]
    pub fn handle_initialize(request: &JsonRpcRequest) -> JsonRpcResponse {
        let init: InitializeRequest = request
            .params
            .clone()
            .and_then(|params| serde_json::from_value(params).ok())
            .unwrap_or_default();

        let negotiated = match init.protocol_version.as_deref() {
            Some(version) if protocol::SUPPORTED_VERSIONS.contains(&version) => version.to_owned(),
            Some(version) => {
                info!(
                    client_version = version,
                    "unsupported protocol version; answering with newest supported"
                );
                protocol::SUPPORTED_VERSIONS[0].to_owned()
            }
            None => protocol::SUPPORTED_VERSIONS[0].to_owned(),
        };

        let result = InitializeResult {
            protocol_version: negotiated,
            server_info: ServerInfo {
                name: protocol::SERVER_NAME.to_owned(),
                version: protocol::SERVER_VERSION.to_owned(),
            },
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
        };

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
            Err(e) => JsonRpcResponse::from_app_error(
                request.id.clone(),
                &AppError::internal(format!("failed to serialize initialize result: {e}")),
            ),
        }
    }

    /// Handle a `ping` request.
    #[must_use]
    pub fn handle_ping(request: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id.clone(), serde_json::json!({}))
    }

    /// Handle `tools/list`: the currently available tools under the
    /// installed capabilities, with their declared schemas.
    #[must_use]
    pub fn handle_tools_list(
        request: &JsonRpcRequest,
        resources: &Arc<ServerResources>,
    ) -> JsonRpcResponse {
        let tools = resources.registry.list_schemas();
        debug!(count = tools.len(), "answering tools/list");
        JsonRpcResponse::success(
            request.id.clone(),
            serde_json::json!({ "tools": tools }),
        )
    }

    /// Handle an unknown method.
    #[must_use]
    pub fn handle_unknown_method(request: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::from_app_error(
            request.id.clone(),
            &AppError::method_not_found(&request.method),
        )
    }
}

/// Default id used when an error reply must reference a request that
/// carried none.
#[must_use]
pub fn default_request_id() -> Value {
    Value::Number(serde_json::Number::from(0))
}
