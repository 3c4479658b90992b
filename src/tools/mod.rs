// ABOUTME: Tool registry with declared schemas, capability gating, and async handler bodies
// ABOUTME: Registration is the only place capability predicates are consulted
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Tool Registry
//!
//! Every callable tool is a [`ToolDefinition`]: a unique name, description,
//! declared parameter schema, capability requirement, context-required flag,
//! and an async handler. The registry is built once at startup, after
//! configuration load; a tool whose capability is not installed stays in the
//! catalog (so invoking it yields `tool_unavailable` rather than
//! `method_not_found`) but is never listed and never executed.

/// Pattern recognition and knowledge building tools
pub mod analysis;
/// Goal clarification and critical-thinking tools
pub mod conceptualization;
/// Progress, recommendation, milestone, and journey tools
pub mod continuity;
/// Methodology and design-validation tools
pub mod design_planning;
/// Literature search and source-management tools
pub mod knowledge;
/// Project and session management tools
pub mod project;
/// Document generation and formatting tools
pub mod publication;
/// Review, quality-gate, and paradigm-validation tools
pub mod validation;

use crate::capabilities::{Capability, CapabilityRegistry};
use crate::context::ContextOverride;
use crate::database::ResearchStore;
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::{JsonSchema, ToolResponse, ToolSchema};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Per-connection active-session slot: the project the session belongs to
/// plus its id.
pub type SessionSlot = Arc<RwLock<Option<(PathBuf, i64)>>>;

/// Create an empty session slot for a new connection.
#[must_use]
pub fn new_session_slot() -> SessionSlot {
    Arc::new(RwLock::new(None))
}

/// The project scope a call runs against.
#[derive(Clone)]
pub struct ProjectScope {
    /// Project root directory
    pub root: PathBuf,
    /// The project's open store
    pub store: Arc<ResearchStore>,
}

/// Everything a tool body may touch during one invocation.
#[derive(Clone)]
pub struct ToolContext {
    /// Shared server resources
    pub resources: Arc<crate::mcp::resources::ServerResources>,
    /// Resolved project scope (the home project for context-free calls)
    pub project: ProjectScope,
    /// This connection's context override slot
    pub override_slot: ContextOverride,
    /// This connection's active-session slot
    pub session_slot: SessionSlot,
}

/// What a tool body returns; the dispatcher wraps it into a [`ToolResponse`].
#[derive(Debug, Clone)]
pub enum ToolOutput {
    /// Plain text result
    Text(String),
    /// Structured result
    Json(Value),
}

impl ToolOutput {
    /// Short free-text summary recorded in the `tool_usage` row.
    #[must_use]
    pub fn summary(&self) -> String {
        let full = match self {
            Self::Text(text) => text.clone(),
            Self::Json(value) => value.to_string(),
        };
        full.chars().take(200).collect()
    }

    /// Wrap into the wire response shape.
    #[must_use]
    pub fn into_response(self, persistence_warning: bool) -> ToolResponse {
        let mut response = match self {
            Self::Text(text) => ToolResponse::text(text),
            Self::Json(value) => ToolResponse::json(value),
        };
        if persistence_warning {
            response.persistence_warning = Some(true);
        }
        response
    }
}

/// A tool's callable body.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with validated arguments.
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput>;
}

/// One registered tool.
#[derive(Clone)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: &'static str,
    /// Short description shown in `tools/list`
    pub description: &'static str,
    /// Declared parameter schema
    pub schema: JsonSchema,
    /// Capability this tool requires
    pub capability: Capability,
    /// Whether the tool fails without resolvable project context
    pub context_required: bool,
    /// Whether the capability requirement was satisfied at registration
    pub available: bool,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDefinition {
    /// Build a definition; availability is filled in at registration.
    #[must_use]
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: JsonSchema,
        capability: Capability,
        context_required: bool,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name,
            description,
            schema,
            capability,
            context_required,
            available: false,
            handler,
        }
    }

    /// The tool's body.
    #[must_use]
    pub fn handler(&self) -> Arc<dyn ToolHandler> {
        self.handler.clone()
    }
}

/// The catalog of callable tools.
pub struct ToolRegistry {
    tools: HashMap<&'static str, ToolDefinition>,
    order: Vec<&'static str>,
    capabilities: CapabilityRegistry,
}

impl ToolRegistry {
    /// Build the full catalog under the given capabilities.
    ///
    /// This is the single place capability predicates are consulted; it runs
    /// after configuration load and performs no file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error when two registrations share a name.
    pub fn build(capabilities: CapabilityRegistry) -> AppResult<Self> {
        let mut registry = Self {
            tools: HashMap::new(),
            order: Vec::new(),
            capabilities,
        };
        conceptualization::register(&mut registry)?;
        design_planning::register(&mut registry)?;
        knowledge::register(&mut registry)?;
        analysis::register(&mut registry)?;
        validation::register(&mut registry)?;
        publication::register(&mut registry)?;
        project::register(&mut registry)?;
        continuity::register(&mut registry)?;
        Ok(registry)
    }

    /// Register one tool. Rejects duplicate names.
    ///
    /// Every tool accepts an optional `project_path` argument for explicit
    /// context targeting, so it is injected into each declared schema here.
    ///
    /// # Errors
    ///
    /// Returns `internal_error` for a duplicate name.
    pub fn register(&mut self, mut definition: ToolDefinition) -> AppResult<()> {
        if self.tools.contains_key(definition.name) {
            return Err(AppError::internal(format!(
                "duplicate tool registration: {}",
                definition.name
            )));
        }
        definition.available = self.capabilities.satisfies(definition.capability);
        definition.schema.properties.insert(
            "project_path".to_owned(),
            crate::mcp::schema::PropertySchema {
                property_type: "string".to_owned(),
                description: Some("Explicit project directory for this call".to_owned()),
            },
        );
        self.order.push(definition.name);
        self.tools.insert(definition.name, definition);
        Ok(())
    }

    /// Look up a tool by name, including unavailable ones.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Schemas of the currently available tools, in registration order.
    #[must_use]
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .filter(|def| def.available)
            .map(|def| ToolSchema {
                name: def.name.to_owned(),
                description: def.description.to_owned(),
                input_schema: def.schema.clone(),
            })
            .collect()
    }

    /// Names of the currently available tools, in registration order.
    #[must_use]
    pub fn available_names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .filter(|def| def.available)
            .map(|def| def.name.to_owned())
            .collect()
    }

    /// Every cataloged name, available or not.
    #[must_use]
    pub fn all_names(&self) -> Vec<String> {
        self.order.iter().map(|n| (*n).to_owned()).collect()
    }

    /// Validate arguments against a tool's declared schema.
    ///
    /// Missing required properties and type mismatches are rejected; extra
    /// arguments are tolerated so clients can attach transport metadata.
    ///
    /// # Errors
    ///
    /// Returns `invalid_params` describing the first violation found.
    pub fn validate_arguments(
        definition: &ToolDefinition,
        args: &Map<String, Value>,
    ) -> AppResult<()> {
        for required in &definition.schema.required {
            if !args.contains_key(required) {
                return Err(AppError::invalid_params(format!(
                    "missing required parameter '{required}' for tool '{}'",
                    definition.name
                )));
            }
        }
        for (name, value) in args {
            if let Some(property) = definition.schema.properties.get(name) {
                if !type_matches(&property.property_type, value) {
                    return Err(AppError::invalid_params(format!(
                        "parameter '{name}' of tool '{}' must be of type {}",
                        definition.name, property.property_type
                    )));
                }
            }
        }
        Ok(())
    }
}

fn type_matches(property_type: &str, value: &Value) -> bool {
    match property_type {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

// ── Argument helpers shared by the tool modules ─────────────────────────

/// Fetch a required string argument.
///
/// # Errors
///
/// Returns `invalid_params` when absent or not a string.
pub fn required_str<'a>(args: &'a Map<String, Value>, name: &str) -> AppResult<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::invalid_params(format!("missing required parameter '{name}'")))
}

/// Fetch an optional string argument.
#[must_use]
pub fn optional_str<'a>(args: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

/// Fetch an optional integer argument with a default.
#[must_use]
pub fn optional_usize(args: &Map<String, Value>, name: &str, default: usize) -> usize {
    args.get(name)
        .and_then(Value::as_u64)
        .map_or(default, |v| v as usize)
}

/// Fetch an optional boolean argument with a default.
#[must_use]
pub fn optional_bool(args: &Map<String, Value>, name: &str, default: bool) -> bool {
    args.get(name).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::build(CapabilityRegistry::all_enabled()).unwrap();
        let duplicate = ToolDefinition::new(
            srrd_intelligence::framework::tool_names::CLARIFY_RESEARCH_GOALS,
            "dup",
            JsonSchema::object(&[], &[]),
            Capability::None,
            false,
            registry
                .get(srrd_intelligence::framework::tool_names::CLARIFY_RESEARCH_GOALS)
                .map(ToolDefinition::handler)
                .unwrap(),
        );
        assert!(registry.register(duplicate).is_err());
    }

    #[test]
    fn gated_tools_stay_in_catalog_but_not_in_listing() {
        let config = crate::config::ServerConfig::default();
        let registry =
            ToolRegistry::build(CapabilityRegistry::from_config(&config)).unwrap();
        let listed = registry.available_names();
        assert!(!listed.contains(&"compile_latex".to_owned()));
        assert!(registry.get("compile_latex").is_some());
        assert!(!registry.get("compile_latex").unwrap().available);
    }

    #[test]
    fn every_tool_accepts_project_path() {
        let registry = ToolRegistry::build(CapabilityRegistry::all_enabled()).unwrap();
        for schema in registry.list_schemas() {
            assert!(
                schema.input_schema.properties.contains_key("project_path"),
                "{} lacks project_path",
                schema.name
            );
        }
    }

    #[test]
    fn validation_rejects_missing_required_and_bad_types() {
        let registry = ToolRegistry::build(CapabilityRegistry::all_enabled()).unwrap();
        let def = registry.get("clarify_research_goals").unwrap();

        let empty = Map::new();
        assert!(ToolRegistry::validate_arguments(def, &empty).is_err());

        let mut bad_type = Map::new();
        bad_type.insert("research_area".to_owned(), Value::from(7));
        assert!(ToolRegistry::validate_arguments(def, &bad_type).is_err());

        let mut ok = Map::new();
        ok.insert("research_area".to_owned(), Value::from("quantum computing"));
        ok.insert("unknown_extra".to_owned(), Value::from(true));
        assert!(ToolRegistry::validate_arguments(def, &ok).is_ok());
    }

    #[test]
    fn every_registered_tool_maps_to_exactly_one_act() {
        let registry = ToolRegistry::build(CapabilityRegistry::all_enabled()).unwrap();
        let framework = srrd_intelligence::ResearchFramework::new();
        for name in registry.all_names() {
            assert!(
                framework.act_for_tool(&name).is_some(),
                "{name} missing from the research framework"
            );
        }
    }
}
