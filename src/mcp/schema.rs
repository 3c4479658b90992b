// ABOUTME: MCP protocol schema definitions and message structures
// ABOUTME: Type-safe shapes for tool schemas, tool responses, and the initialize handshake
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! MCP Protocol Schema Definitions
//!
//! Type-safe definitions for protocol messages and tool schemas, so the
//! wire shapes live in one place instead of hand-built JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Server Information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name identifier
    pub name: String,
    /// Server version string
    pub version: String,
}

/// MCP Tool Schema Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name identifier
    pub name: String,
    /// Human-readable tool description
    pub description: String,
    /// JSON Schema for tool input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonSchema,
}

/// JSON Schema Definition
///
/// Properties use a `BTreeMap` so `tools/list` output is stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Schema type (always "object" for tool inputs)
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property definitions
    pub properties: BTreeMap<String, PropertySchema>,
    /// Required property names
    pub required: Vec<String>,
}

impl JsonSchema {
    /// Build an object schema from `(name, type, description)` triples plus
    /// the required-name list.
    #[must_use]
    pub fn object(properties: &[(&str, &str, &str)], required: &[&str]) -> Self {
        Self {
            schema_type: "object".to_owned(),
            properties: properties
                .iter()
                .map(|(name, ty, description)| {
                    (
                        (*name).to_owned(),
                        PropertySchema {
                            property_type: (*ty).to_owned(),
                            description: Some((*description).to_owned()),
                        },
                    )
                })
                .collect(),
            required: required.iter().map(|r| (*r).to_owned()).collect(),
        }
    }
}

/// JSON Schema Property Definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Property type ("string", "integer", "number", "boolean", "array", "object")
    #[serde(rename = "type")]
    pub property_type: String,
    /// Human-readable property description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tool Call parameters for `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to execute
    pub name: String,
    /// Tool arguments as a JSON object
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

/// Content items carried in a tool response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    /// Plain text content
    #[serde(rename = "text")]
    Text {
        /// Text content string
        text: String,
    },
    /// Structured JSON content
    #[serde(rename = "json")]
    Json {
        /// Structured payload
        json: serde_json::Value,
    },
}

/// Tool Response after execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Response content items
    pub content: Vec<Content>,
    /// Whether the tool execution resulted in an error
    #[serde(rename = "isError")]
    pub is_error: bool,
    /// Set when a usage or interaction write was dropped after a
    /// successful execution
    #[serde(
        rename = "persistenceWarning",
        skip_serializing_if = "Option::is_none"
    )]
    pub persistence_warning: Option<bool>,
}

impl ToolResponse {
    /// Successful text response
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
            persistence_warning: None,
        }
    }

    /// Successful structured response
    #[must_use]
    pub fn json(json: serde_json::Value) -> Self {
        Self {
            content: vec![Content::Json { json }],
            is_error: false,
            persistence_warning: None,
        }
    }
}

/// Initialize request parameters (all optional; the handshake tolerates
/// an empty params object)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitializeRequest {
    /// Client-proposed protocol version
    #[serde(rename = "protocolVersion", default)]
    pub protocol_version: Option<String>,
    /// Client identification
    #[serde(rename = "clientInfo", default)]
    pub client_info: Option<serde_json::Value>,
}

/// Tools capability advertisement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {
    /// Whether the server emits list-changed notifications
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Server capability advertisement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tool support
    pub tools: ToolsCapability,
}

/// Initialize handshake result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    /// Negotiated protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server identification
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    /// Advertised capabilities
    pub capabilities: ServerCapabilities,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_schema_serializes_with_camel_case_input_schema() {
        let schema = ToolSchema {
            name: "clarify_research_goals".to_owned(),
            description: "Socratic goal clarification".to_owned(),
            input_schema: JsonSchema::object(
                &[("research_area", "string", "Area under study")],
                &["research_area"],
            ),
        };
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["inputSchema"]["type"], "object");
        assert_eq!(
            value["inputSchema"]["properties"]["research_area"]["type"],
            "string"
        );
        assert_eq!(value["inputSchema"]["required"][0], "research_area");
    }

    #[test]
    fn text_response_has_is_error_false() {
        let value = serde_json::to_value(ToolResponse::text("done")).unwrap();
        assert_eq!(value["isError"], false);
        assert_eq!(value["content"][0]["type"], "text");
        assert!(value.get("persistenceWarning").is_none());
    }

    #[test]
    fn initialize_request_tolerates_empty_params() {
        let request: InitializeRequest = serde_json::from_str("{}").unwrap();
        assert!(request.protocol_version.is_none());
    }
}
