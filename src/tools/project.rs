// ABOUTME: Project management tools for initialization, context switching, and sessions
// ABOUTME: switch/reset mutate only the invoking connection's override slot
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::{optional_bool, optional_str, required_str, ToolContext, ToolDefinition, ToolOutput, ToolRegistry};
use crate::capabilities::Capability;
use crate::constants::project_layout;
use crate::context::is_project_root;
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::JsonSchema;
use crate::models::{ProjectConfig, SessionType};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use srrd_intelligence::framework::tool_names as tn;
use std::path::PathBuf;
use std::sync::Arc;

/// Register the project-management tools.
///
/// # Errors
///
/// Propagates duplicate-name registration errors.
pub fn register(registry: &mut ToolRegistry) -> AppResult<()> {
    registry.register(ToolDefinition::new(
        tn::INITIALIZE_PROJECT,
        "Initialize a directory as a research project with a .srrd marker",
        JsonSchema::object(
            &[
                ("name", "string", "Human project name"),
                ("description", "string", "Project description"),
                ("domain", "string", "Domain tag, e.g. physics"),
                ("methodology", "string", "Methodology tag"),
                ("novel_theory_mode", "boolean", "Emphasize novel-theory tooling"),
            ],
            &["name"],
        ),
        Capability::None,
        false,
        Arc::new(InitializeProject),
    ))?;

    registry.register(ToolDefinition::new(
        tn::SWITCH_PROJECT_CONTEXT,
        "Switch this connection's project context to an initialized project",
        JsonSchema::object(
            &[("target_path", "string", "Project directory to switch to")],
            &["target_path"],
        ),
        Capability::None,
        false,
        Arc::new(SwitchProjectContext),
    ))?;

    registry.register(ToolDefinition::new(
        tn::RESET_PROJECT_CONTEXT,
        "Clear this connection's project context override",
        JsonSchema::object(&[], &[]),
        Capability::None,
        false,
        Arc::new(ResetProjectContext),
    ))?;

    registry.register(ToolDefinition::new(
        tn::START_RESEARCH_SESSION,
        "Open a research session for grouping subsequent interactions",
        JsonSchema::object(
            &[
                ("session_type", "string", "planning, execution, analysis, publication, or novel_theory"),
                ("paradigm_innovation", "boolean", "Mark as a paradigm-innovation session"),
            ],
            &[],
        ),
        Capability::None,
        true,
        Arc::new(StartResearchSession),
    ))?;

    Ok(())
}

struct InitializeProject;

#[async_trait]
impl super::ToolHandler for InitializeProject {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let name = required_str(args, "name")?;
        // initialize_project targets the explicit path when given, otherwise
        // the resolved scope (typically the home project).
        let root = optional_str(args, "project_path")
            .map_or_else(|| ctx.project.root.clone(), PathBuf::from);

        let config = ProjectConfig {
            name: name.to_owned(),
            description: optional_str(args, "description").unwrap_or("").to_owned(),
            domain: optional_str(args, "domain").unwrap_or("").to_owned(),
            methodology: optional_str(args, "methodology").unwrap_or("").to_owned(),
            novel_theory_mode: optional_bool(args, "novel_theory_mode", false),
            paradigm_focus: String::new(),
        };

        let marker = root.join(project_layout::MARKER_DIR);
        tokio::fs::create_dir_all(&marker).await?;
        tokio::fs::create_dir_all(root.join(project_layout::WORK_DIR)).await?;
        tokio::fs::create_dir_all(root.join(project_layout::PUBLICATIONS_DIR)).await?;

        let config_path = marker.join(project_layout::CONFIG_FILE);
        let raw = serde_json::to_string_pretty(&config)?;
        tokio::fs::write(&config_path, raw).await?;

        // Opening the store creates sessions.db and the project row.
        let store = ctx.resources.stores.get_or_open(&root).await?;

        Ok(ToolOutput::Json(json!({
            "initialized": true,
            "project_path": root.display().to_string(),
            "project_id": store.project_id(),
            "config_path": config_path.display().to_string(),
        })))
    }
}

struct SwitchProjectContext;

#[async_trait]
impl super::ToolHandler for SwitchProjectContext {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let target = PathBuf::from(required_str(args, "target_path")?);

        if !is_project_root(&target) {
            return Err(AppError::validation(format!(
                "{} is not an initialized project; run initialize_project first",
                target.display()
            )));
        }
        // Opening validates the store before the override takes effect.
        ctx.resources.stores.get_or_open(&target).await?;

        *ctx.override_slot.write().await = Some(target.clone());

        Ok(ToolOutput::Json(json!({
            "switched": true,
            "active_project": target.display().to_string(),
        })))
    }
}

struct ResetProjectContext;

#[async_trait]
impl super::ToolHandler for ResetProjectContext {
    async fn call(&self, ctx: &ToolContext, _args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let previous = ctx.override_slot.write().await.take();
        Ok(ToolOutput::Json(json!({
            "reset": true,
            "previous_override": previous.map(|p| p.display().to_string()),
        })))
    }
}

struct StartResearchSession;

#[async_trait]
impl super::ToolHandler for StartResearchSession {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let session_type =
            SessionType::parse_or_default(optional_str(args, "session_type").unwrap_or(""));
        let paradigm_innovation = optional_bool(args, "paradigm_innovation", false);

        let session_id = ctx
            .project
            .store
            .session_open(session_type, "local", paradigm_innovation)
            .await?;
        *ctx.session_slot.write().await = Some((ctx.project.root.clone(), session_id));

        Ok(ToolOutput::Json(json!({
            "session_id": session_id,
            "session_type": session_type.as_str(),
            "paradigm_innovation": paradigm_innovation,
            "project_path": ctx.project.root.display().to_string(),
        })))
    }
}
