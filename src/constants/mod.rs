// ABOUTME: Application constants for protocol, defaults, and environment configuration
// ABOUTME: Single source for magic values shared across transports, config, and tools
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

/// Protocol-level constants
pub mod protocol {
    /// Server name reported in the `initialize` handshake
    pub const SERVER_NAME: &str = "srrd-builder-mcp";

    /// Server version reported in the `initialize` handshake
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// MCP protocol versions supported, in preference order
    pub const SUPPORTED_VERSIONS: &[&str] = &["2025-06-18", "2024-11-05"];

    /// JSON-RPC 2.0 version string
    pub const JSONRPC_VERSION: &str = "2.0";
}

/// Default configuration values
pub mod defaults {
    /// Default WebSocket listen port
    pub const MCP_PORT: u16 = 8765;

    /// Default WebSocket bind address; the server is loopback-only
    pub const MCP_HOST: &str = "127.0.0.1";

    /// Rolling window for velocity reports, in days
    pub const VELOCITY_WINDOW_DAYS: u32 = 7;

    /// Trailing invocations inspected by contextual recommendations
    pub const RECOMMENDATION_LOOKBACK: usize = 5;

    /// LaTeX compile subprocess timeout, in seconds
    pub const LATEX_TIMEOUT_SECS: u64 = 60;

    /// Bounded-backoff attempts for locked-store writes
    pub const STORE_WRITE_ATTEMPTS: u32 = 5;

    /// Base delay between locked-store write attempts, in milliseconds
    pub const STORE_WRITE_BACKOFF_MS: u64 = 50;
}

/// Environment variable names recognized by the server
pub mod env_config {
    /// Overrides `mcp_port`
    pub const MCP_PORT: &str = "SRRD_MCP_PORT";

    /// Overrides `features.latex`
    pub const LATEX_INSTALLED: &str = "SRRD_LATEX_INSTALLED";

    /// Overrides `features.vector_db`
    pub const VECTOR_DB_INSTALLED: &str = "SRRD_VECTOR_DB_INSTALLED";

    /// Names the active project directory (context resolution step 3)
    pub const PROJECT_PATH: &str = "SRRD_PROJECT_PATH";

    /// Overrides `log_level`
    pub const LOG_LEVEL: &str = "SRRD_LOG_LEVEL";
}

/// Project marker layout on disk
pub mod project_layout {
    /// Marker directory identifying a research project root
    pub const MARKER_DIR: &str = ".srrd";

    /// Project configuration file inside the marker
    pub const CONFIG_FILE: &str = "config.json";

    /// Relational store file inside the marker
    pub const SESSIONS_DB: &str = "sessions.db";

    /// Vector index file inside the marker (vector capability only)
    pub const KNOWLEDGE_DB: &str = "knowledge.db";

    /// Template subtree inside the marker
    pub const TEMPLATES_DIR: &str = "templates";

    /// Working-notes directory at the project root
    pub const WORK_DIR: &str = "work";

    /// Generated-document directory at the project root
    pub const PUBLICATIONS_DIR: &str = "publications";
}
