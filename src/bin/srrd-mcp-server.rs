// ABOUTME: Server binary: loads configuration, builds resources, runs the transports
// ABOUTME: Supports stdio-only, WebSocket-only, or both transports per invocation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use anyhow::Result;
use clap::Parser;
use srrd_mcp_server::config::ServerConfig;
use srrd_mcp_server::frontend;
use srrd_mcp_server::logging::{self, LogFormat};
use srrd_mcp_server::mcp::resources::ServerResources;
use srrd_mcp_server::mcp::transport_manager::{TransportManager, TransportMode};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "srrd-mcp-server", about = "SRRD research-assistance MCP server")]
struct Args {
    /// Path to the installed_features manifest written by the installer
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// WebSocket listen port (overrides configuration)
    #[arg(long)]
    port: Option<u16>,

    /// Transport selection: stdio, websocket, or both
    #[arg(long, default_value = "both")]
    transport: String,

    /// Emit logs as JSON instead of the compact format
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::load(args.manifest.as_deref())?;
    if let Some(port) = args.port {
        config.mcp_port = port;
    }

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    logging::init(config.log_level, format);

    info!(
        version = srrd_mcp_server::constants::protocol::SERVER_VERSION,
        port = config.mcp_port,
        "starting SRRD MCP server"
    );

    let resources = ServerResources::new(config)?;

    let mismatches = frontend::validate_against_registry(&resources.registry);
    if !mismatches.is_empty() {
        warn!(count = mismatches.len(), "frontend contract gaps: {mismatches:?}");
    }

    let mode = TransportMode::parse_or_default(&args.transport);
    TransportManager::new(resources).run(mode).await?;
    Ok(())
}
