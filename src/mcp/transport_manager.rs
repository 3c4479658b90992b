// ABOUTME: Transport coordination for the MCP server with stdio and WebSocket transports
// ABOUTME: stdio frames newline-delimited JSON on stdin/stdout through the shared dispatcher
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::request_processor::McpRequestProcessor;
use super::resources::ServerResources;
use crate::errors::AppResult;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

/// Which transports a server run exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// stdin/stdout only (subprocess invocation by a host agent)
    Stdio,
    /// WebSocket listener only
    WebSocket,
    /// Both transports concurrently
    Both,
}

impl TransportMode {
    /// Parse with a both-transports default.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "stdio" => Self::Stdio,
            "websocket" | "ws" => Self::WebSocket,
            _ => Self::Both,
        }
    }
}

/// Coordinates the configured transports over shared resources.
pub struct TransportManager {
    resources: Arc<ServerResources>,
}

impl TransportManager {
    /// Create a manager over shared resources.
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Run the selected transports until the host ends them.
    ///
    /// # Errors
    ///
    /// Returns an error when a transport fails to start; a finished stdio
    /// loop (host closed stdin) is a normal exit.
    pub async fn run(&self, mode: TransportMode) -> AppResult<()> {
        match mode {
            TransportMode::Stdio => {
                StdioTransport::new(self.resources.clone()).run().await
            }
            TransportMode::WebSocket => {
                crate::websocket::serve(self.resources.clone()).await
            }
            TransportMode::Both => {
                let ws_resources = self.resources.clone();
                let ws_handle = tokio::spawn(async move {
                    if let Err(e) = crate::websocket::serve(ws_resources).await {
                        warn!("WebSocket transport failed: {e}");
                    }
                });

                let result = StdioTransport::new(self.resources.clone()).run().await;
                ws_handle.abort();
                result
            }
        }
    }
}

/// Handles the stdio transport: one JSON object per line in, one per line
/// out, no framing headers. Lifecycle is controlled by the host process.
pub struct StdioTransport {
    resources: Arc<ServerResources>,
}

impl StdioTransport {
    /// Create the transport over shared resources.
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Run until stdin closes. Requests are processed in arrival order and
    /// replies are written in the same order.
    ///
    /// # Errors
    ///
    /// Returns an error when stdin or stdout I/O fails.
    pub async fn run(&self) -> AppResult<()> {
        info!("MCP stdio transport ready - listening on stdin/stdout");

        let processor = McpRequestProcessor::new(self.resources.clone());
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(stdin).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(reply) = processor.process_frame(&line).await {
                stdout.write_all(reply.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed; stdio transport finished");
        Ok(())
    }
}
