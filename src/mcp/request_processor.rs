// ABOUTME: The shared dispatcher: validation, routing, capability and context gating
// ABOUTME: Executes tool bodies, records usage and interactions, shapes error replies
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Request Processor
//!
//! One dispatcher behind every transport; transports only adapt framing.
//! A `tools/call` moves through: lookup → capability check → context
//! resolution → parameter validation → execution → usage recording → reply.
//! Rejections exit before execution and write nothing; recording failures
//! after a successful execution set `persistenceWarning` instead of
//! shadowing the result.

use super::protocol::ProtocolHandler;
use super::resources::ServerResources;
use super::schema::ToolCall;
use crate::context::{new_override_slot, ContextOverride};
use crate::errors::{AppError, AppResult};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use crate::models::SessionType;
use crate::tools::{new_session_slot, ProjectScope, SessionSlot, ToolContext, ToolDefinition, ToolOutput, ToolRegistry};
use serde_json::{json, Map, Value};
use srrd_intelligence::analyzer;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-connection mutable state: the context override and active session.
#[derive(Clone)]
pub struct ConnectionState {
    /// Context override slot (`switch_project_context` target)
    pub override_slot: ContextOverride,
    /// Active-session slot
    pub session_slot: SessionSlot,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionState {
    /// Fresh state for a new connection; no override is inherited.
    #[must_use]
    pub fn new() -> Self {
        Self {
            override_slot: new_override_slot(),
            session_slot: new_session_slot(),
        }
    }
}

/// Processes JSON-RPC requests for one connection.
pub struct McpRequestProcessor {
    resources: Arc<ServerResources>,
    connection: ConnectionState,
}

impl McpRequestProcessor {
    /// Create a processor with fresh connection state.
    #[must_use]
    pub fn new(resources: Arc<ServerResources>) -> Self {
        Self {
            resources,
            connection: ConnectionState::new(),
        }
    }

    /// Parse one raw frame, process it, and serialize the reply.
    ///
    /// Returns `None` for notifications. Malformed JSON is answered with a
    /// `parse_error` reply on the same connection.
    pub async fn process_frame(&self, raw: &str) -> Option<String> {
        let request: JsonRpcRequest = match serde_json::from_str(raw) {
            Ok(request) => request,
            Err(e) => {
                warn!("unparseable frame: {e}");
                let response = JsonRpcResponse::from_app_error(
                    None,
                    &AppError::parse(format!("invalid JSON: {e}")),
                );
                return serde_json::to_string(&response).ok();
            }
        };

        let response = self.handle_request(request).await?;
        match serde_json::to_string(&response) {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                warn!("failed to serialize response: {e}");
                None
            }
        }
    }

    /// Handle one request; `None` means no reply (notification).
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "received request");

        if request.jsonrpc != JSONRPC_VERSION || request.method.is_empty() {
            let err = AppError::invalid_request(format!(
                "expected jsonrpc \"{JSONRPC_VERSION}\" with a method"
            ));
            return Some(JsonRpcResponse::from_app_error(request.id.clone(), &err));
        }

        if request.method.starts_with("notifications/") {
            debug!(method = %request.method, "notification acknowledged");
            return None;
        }

        let is_notification = request.is_notification();
        let response = match request.method.as_str() {
            "initialize" => ProtocolHandler::handle_initialize(&request),
            "ping" => ProtocolHandler::handle_ping(&request),
            "tools/list" => ProtocolHandler::handle_tools_list(&request, &self.resources),
            "tools/call" => self.handle_tools_call(&request).await,
            _ => ProtocolHandler::handle_unknown_method(&request),
        };

        // Requests without an id expect no reply even when processed.
        (!is_notification).then_some(response)
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        match self.execute_tools_call(request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                debug!(kind = error.kind.as_str(), "tools/call rejected: {}", error.message);
                JsonRpcResponse::from_app_error(id, &error)
            }
        }
    }

    async fn execute_tools_call(&self, request: &JsonRpcRequest) -> AppResult<Value> {
        let params = request
            .params
            .clone()
            .ok_or_else(|| AppError::invalid_params("tools/call requires params"))?;
        let call: ToolCall = serde_json::from_value(params)
            .map_err(|e| AppError::invalid_params(format!("malformed tools/call params: {e}")))?;

        let args: Map<String, Value> = match call.arguments {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(AppError::invalid_params("arguments must be a JSON object"));
            }
        };

        let definition = self
            .resources
            .registry
            .get(&call.name)
            .ok_or_else(|| AppError::method_not_found(&call.name))?
            .clone();

        if !definition.available {
            return Err(AppError::tool_unavailable(
                definition.name,
                definition.capability.as_str(),
            ));
        }

        let explicit = args.get("project_path").and_then(Value::as_str);
        let project_root = if definition.context_required {
            self.resources
                .resolver
                .resolve(explicit, &self.connection.override_slot)
                .await
                .ok_or_else(|| AppError::context_missing(definition.name))?
        } else {
            self.resources
                .resolver
                .resolve_or_home(explicit, &self.connection.override_slot)
                .await
        };

        let store = self.resources.stores.get_or_open(&project_root).await?;

        ToolRegistry::validate_arguments(&definition, &args)?;

        let ctx = ToolContext {
            resources: self.resources.clone(),
            project: ProjectScope {
                root: project_root,
                store,
            },
            override_slot: self.connection.override_slot.clone(),
            session_slot: self.connection.session_slot.clone(),
        };

        let output = definition.handler().call(&ctx, &args).await?;

        // The usage row lands before the reply frame; a dropped write is
        // reported on the reply, never allowed to shadow the result.
        let persisted = self.record_call(&ctx, &definition, &args, &output).await;

        let response = output.into_response(!persisted);
        Ok(serde_json::to_value(response)?)
    }

    /// Append the `tool_usage` row and, when the call carried free text, the
    /// enriched interaction row. Returns whether all writes landed.
    async fn record_call(
        &self,
        ctx: &ToolContext,
        definition: &ToolDefinition,
        args: &Map<String, Value>,
        output: &ToolOutput,
    ) -> bool {
        let session_id = self.ensure_session(ctx).await;

        let usage_ok = match ctx
            .project
            .store
            .record_tool_usage(definition.name, &output.summary(), session_id)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!(tool = definition.name, "usage row dropped: {e}");
                false
            }
        };

        let fields = analyzer::free_text_fields(args);
        if fields.is_empty() {
            return usage_ok;
        }
        let Some(session_id) = session_id else {
            return false;
        };

        let analysis = analyzer::analyze(definition.name, &fields);
        let recent = ctx
            .project
            .store
            .recent_tools_for_session(session_id, 5)
            .await
            .unwrap_or_default();
        let progression = analyzer::analyze_progression(&self.resources.framework, &recent);

        let mut content_map = Map::new();
        for (field, text) in &fields {
            content_map.insert(field.clone(), Value::String(text.clone()));
        }
        let content = serde_json::to_string(&content_map).unwrap_or_else(|_| "{}".to_owned());
        let metadata = json!({
            "semantic_analysis": analysis,
            "progression_analysis": progression,
        })
        .to_string();

        let interaction_ok = ctx
            .project
            .store
            .record_interaction(crate::database::interactions::NewInteraction {
                session_id,
                interaction_type: "enhanced_tool_usage",
                content: &content,
                response: None,
                domain: Some(&analysis.primary_domain),
                novel_theory_context: analysis.novel_theory_indicators.as_deref(),
                metadata: Some(&metadata),
            })
            .await;
        match interaction_ok {
            Ok(_) => usage_ok,
            Err(e) => {
                warn!(tool = definition.name, "interaction row dropped: {e}");
                false
            }
        }
    }

    /// Resolve the session the call belongs to, opening an implicit
    /// execution session on first tracked use. Best-effort.
    async fn ensure_session(&self, ctx: &ToolContext) -> Option<i64> {
        if let Some((root, session_id)) = self.connection.session_slot.read().await.clone() {
            if root == ctx.project.root {
                return Some(session_id);
            }
        }

        if let Ok(Some(session)) = ctx.project.store.latest_active_session().await {
            *self.connection.session_slot.write().await =
                Some((ctx.project.root.clone(), session.id));
            return Some(session.id);
        }

        match ctx
            .project
            .store
            .session_open(SessionType::Execution, "local", false)
            .await
        {
            Ok(session_id) => {
                *self.connection.session_slot.write().await =
                    Some((ctx.project.root.clone(), session_id));
                Some(session_id)
            }
            Err(e) => {
                warn!("could not open implicit session: {e}");
                None
            }
        }
    }
}
