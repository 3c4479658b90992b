// ABOUTME: Centralized error handling and error kinds for the SRRD MCP server
// ABOUTME: Maps stable error kinds onto JSON-RPC 2.0 error codes for all transports
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Unified Error Handling System
//!
//! One error type crosses every module boundary in the server. Each variant
//! carries a stable `kind` string that appears verbatim in JSON-RPC error
//! `data` payloads, so clients can match on kinds instead of prose.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error kinds used throughout the application.
///
/// Standard kinds map onto the JSON-RPC 2.0 reserved codes; application
/// kinds map into the -32000..-32099 server-error range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Frame was not valid JSON
    ParseError,
    /// JSON was valid but not a JSON-RPC request
    InvalidRequest,
    /// Unknown method or unknown tool name
    MethodNotFound,
    /// Declared parameter schema was violated
    InvalidParams,
    /// Uncaught failure inside the server
    InternalError,
    /// Tool exists but its capability is not installed
    ToolUnavailable,
    /// Context-required tool invoked with no resolvable project
    ContextMissing,
    /// Project store could not be opened or queried
    StoreUnavailable,
    /// Tool rejected domain-invalid input
    ValidationFailed,
    /// External collaborator returned a non-zero result
    ExternalFailure,
}

impl ErrorKind {
    /// JSON-RPC 2.0 error code for this kind
    #[must_use]
    pub const fn jsonrpc_code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ContextMissing => -32000,
            Self::ToolUnavailable => -32001,
            Self::StoreUnavailable => -32002,
            Self::ValidationFailed => -32003,
            Self::ExternalFailure => -32004,
        }
    }

    /// Stable snake_case name carried in error `data.kind`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::InvalidRequest => "invalid_request",
            Self::MethodNotFound => "method_not_found",
            Self::InvalidParams => "invalid_params",
            Self::InternalError => "internal_error",
            Self::ToolUnavailable => "tool_unavailable",
            Self::ContextMissing => "context_missing",
            Self::StoreUnavailable => "store_unavailable",
            Self::ValidationFailed => "validation_failed",
            Self::ExternalFailure => "external_failure",
        }
    }

    /// Generic description used when a message should not leak details
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ParseError => "Message was not valid JSON",
            Self::InvalidRequest => "Message was not a valid JSON-RPC request",
            Self::MethodNotFound => "Method or tool not found",
            Self::InvalidParams => "Parameters do not match the declared schema",
            Self::InternalError => "An internal server error occurred",
            Self::ToolUnavailable => "Tool requires a capability that is not installed",
            Self::ContextMissing => "No project context could be resolved for this call",
            Self::StoreUnavailable => "The project store could not be opened",
            Self::ValidationFailed => "Input was rejected by the tool's domain validation",
            Self::ExternalFailure => "An external collaborator reported a failure",
        }
    }
}

impl Serialize for ErrorKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "parse_error" => Ok(Self::ParseError),
            "invalid_request" => Ok(Self::InvalidRequest),
            "method_not_found" => Ok(Self::MethodNotFound),
            "invalid_params" => Ok(Self::InvalidParams),
            "internal_error" => Ok(Self::InternalError),
            "tool_unavailable" => Ok(Self::ToolUnavailable),
            "context_missing" => Ok(Self::ContextMissing),
            "store_unavailable" => Ok(Self::StoreUnavailable),
            "validation_failed" => Ok(Self::ValidationFailed),
            "external_failure" => Ok(Self::ExternalFailure),
            _ => Err(serde::de::Error::unknown_variant(&s, &[])),
        }
    }
}

/// Application error carrying a stable kind plus a human-readable message.
#[derive(Debug, Clone, Error)]
pub struct AppError {
    /// Stable error kind
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Collaborator diagnostics or other detail safe to surface
    pub details: Option<String>,
}

impl AppError {
    /// Create a new error with the given kind and message
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Attach detail text (e.g. a compiler log tail)
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// JSON-RPC error code for this error
    #[must_use]
    pub const fn jsonrpc_code(&self) -> i32 {
        self.kind.jsonrpc_code()
    }

    /// Parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError, message)
    }

    /// Invalid request shape
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Unknown method or tool
    #[must_use]
    pub fn method_not_found(name: impl fmt::Display) -> Self {
        Self::new(ErrorKind::MethodNotFound, format!("Unknown method or tool: {name}"))
    }

    /// Parameter schema violation
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParams, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// Capability-gated tool invoked without its capability
    #[must_use]
    pub fn tool_unavailable(tool: impl fmt::Display, capability: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::ToolUnavailable,
            format!("Tool '{tool}' requires the '{capability}' capability, which is not installed"),
        )
    }

    /// Context-required tool with no resolvable project
    #[must_use]
    pub fn context_missing(tool: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::ContextMissing,
            format!("Tool '{tool}' requires project context and none could be resolved"),
        )
    }

    /// Store open or query failure
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Domain validation failure inside a tool body
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }

    /// External collaborator failure with its diagnostic text
    #[must_use]
    pub fn external(collaborator: impl fmt::Display, diagnostics: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::ExternalFailure,
            format!("{collaborator} reported a failure"),
        )
        .with_details(diagnostics)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Conversion from `anyhow::Error`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Conversion from `std::io::Error`
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::internal(format!("IO error: {error}"))
    }
}

/// Conversion from `serde_json::Error`
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON error: {error}"))
    }
}

/// Conversion from `sqlx::Error`
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::store_unavailable(format!("store error: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_expected_jsonrpc_codes() {
        assert_eq!(ErrorKind::ParseError.jsonrpc_code(), -32700);
        assert_eq!(ErrorKind::InvalidRequest.jsonrpc_code(), -32600);
        assert_eq!(ErrorKind::MethodNotFound.jsonrpc_code(), -32601);
        assert_eq!(ErrorKind::InvalidParams.jsonrpc_code(), -32602);
        assert_eq!(ErrorKind::InternalError.jsonrpc_code(), -32603);
        assert_eq!(ErrorKind::ContextMissing.jsonrpc_code(), -32000);
    }

    #[test]
    fn application_codes_stay_in_server_error_range() {
        for kind in [
            ErrorKind::ToolUnavailable,
            ErrorKind::ContextMissing,
            ErrorKind::StoreUnavailable,
            ErrorKind::ValidationFailed,
            ErrorKind::ExternalFailure,
        ] {
            let code = kind.jsonrpc_code();
            assert!((-32099..=-32000).contains(&code), "{code} out of range");
        }
    }

    #[test]
    fn kind_serializes_as_stable_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ContextMissing).unwrap();
        assert_eq!(json, "\"context_missing\"");
        let back: ErrorKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorKind::ContextMissing);
    }
}
