// ABOUTME: Configuration management for the SRRD MCP server
// ABOUTME: Re-exports the environment-backed server configuration types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

/// Environment-based server configuration
pub mod environment;

pub use environment::{FeatureFlags, LogLevel, ServerConfig};
