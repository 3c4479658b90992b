// ABOUTME: WebSocket transport serving the shared JSON-RPC dispatcher on loopback
// ABOUTME: One JSON message per frame; each connection gets independent context state
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! `WebSocket` transport
//!
//! Listens on the configured loopback endpoint (default
//! `ws://127.0.0.1:8765`). Every connection gets its own
//! [`McpRequestProcessor`], so context overrides and session tracking are
//! never shared across connections. Frames on one connection are processed
//! sequentially, which keeps replies in request order.

use crate::errors::{AppError, AppResult};
use crate::mcp::request_processor::McpRequestProcessor;
use crate::mcp::resources::ServerResources;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Serve the WebSocket transport until the task is aborted.
///
/// # Errors
///
/// Returns an error when the listener cannot bind or the server fails.
pub async fn serve(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = format!("{}:{}", resources.config.mcp_host, resources.config.mcp_port);
    let app = Router::new()
        .route("/", get(upgrade_handler))
        .with_state(resources);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("cannot bind {addr}: {e}")))?;
    info!("MCP WebSocket transport ready on ws://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("WebSocket server failed: {e}")))
}

async fn upgrade_handler(
    ws: WebSocketUpgrade,
    State(resources): State<Arc<ServerResources>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, resources))
}

/// Drive one connection: fresh dispatcher state, sequential frame
/// processing, ids preserved end-to-end.
async fn handle_connection(socket: WebSocket, resources: Arc<ServerResources>) {
    let connection_id = Uuid::new_v4();
    debug!(%connection_id, "WebSocket connection opened");

    let processor = McpRequestProcessor::new(resources);
    let (mut sink, mut stream) = socket.split();

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                if let Some(reply) = processor.process_frame(&text).await {
                    if sink.send(Message::Text(reply)).await.is_err() {
                        break;
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                if sink.send(Message::Pong(payload)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    // A disconnect aborts any in-flight work at the next suspension point;
    // rows committed before the abort remain.
    debug!(%connection_id, "WebSocket connection closed");
    let _ = sink.close().await.map_err(|e| warn!("close failed: {e}"));
}
