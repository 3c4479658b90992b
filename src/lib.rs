// ABOUTME: Main library entry point for the SRRD builder MCP server
// ABOUTME: Research-assistance tools over MCP with stdio and WebSocket transports
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

#![deny(unsafe_code)]

//! # SRRD MCP Server
//!
//! An interactive research-assistance server speaking the Model Context
//! Protocol (MCP). It exposes a catalog of structured tools - Socratic
//! questioning, methodology advisors, novel-theory validation, progress
//! analyzers, document and bibliography generators, knowledge search - to a
//! conversational agent over JSON-RPC 2.0.
//!
//! ## Architecture
//!
//! - **Transports**: newline-delimited JSON over stdio, and a loopback
//!   WebSocket endpoint; both adapt framing onto one shared dispatcher.
//! - **Dispatcher**: validates, routes, gates by capability and project
//!   context, executes tool bodies, and records usage.
//! - **Store**: each project owns a private SQLite store under its `.srrd`
//!   marker directory.
//! - **Intelligence**: the `srrd-intelligence` workspace crate computes
//!   progress, recommendations, milestones, and journey analytics from
//!   recorded usage.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use srrd_mcp_server::config::ServerConfig;
//! use srrd_mcp_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::load(None)?;
//!     println!("WebSocket endpoint: ws://{}:{}", config.mcp_host, config.mcp_port);
//!     Ok(())
//! }
//! ```

/// Capability registry for install-time feature groups
pub mod capabilities;

/// Configuration management
pub mod config;

/// Application constants
pub mod constants;

/// Project context resolution
pub mod context;

/// Per-project relational store
pub mod database;

/// Unified error handling with stable kinds
pub mod errors;

/// Frontend contract: static catalog and default arguments
pub mod frontend;

/// JSON-RPC 2.0 foundation shared by both transports
pub mod jsonrpc;

/// LaTeX collaborator seam
pub mod latex;

/// Structured logging setup
pub mod logging;

/// Model Context Protocol server implementation
pub mod mcp;

/// Common data models
pub mod models;

/// Tool registry and tool implementations
pub mod tools;

/// Vector-index collaborator seam
pub mod vector;

/// WebSocket transport
pub mod websocket;
