// ABOUTME: Research-continuity tools surfacing the workflow-intelligence engine
// ABOUTME: Progress, velocity, guidance, recommendations, milestones, journey, and sessions
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::{optional_bool, optional_str, optional_usize, ToolContext, ToolDefinition, ToolOutput, ToolRegistry};
use crate::capabilities::Capability;
use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::JsonSchema;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use srrd_intelligence::framework::tool_names as tn;
use srrd_intelligence::guidance::{self, ExperienceLevel};
use srrd_intelligence::journey::{self, TimePeriod};
use srrd_intelligence::{milestones, progress, recommendations, velocity, ResearchAct};
use std::collections::HashSet;
use std::sync::Arc;

/// Register the research-continuity tools.
///
/// # Errors
///
/// Propagates duplicate-name registration errors.
pub fn register(registry: &mut ToolRegistry) -> AppResult<()> {
    registry.register(ToolDefinition::new(
        tn::GET_RESEARCH_PROGRESS,
        "Per-act research progress with completion bars and totals",
        JsonSchema::object(&[], &[]),
        Capability::None,
        true,
        Arc::new(GetResearchProgress),
    ))?;

    registry.register(ToolDefinition::new(
        tn::GET_CONTEXTUAL_RECOMMENDATIONS,
        "Pattern-classified recommendations for the next tools to run",
        JsonSchema::object(
            &[("lookback", "integer", "Trailing invocations to inspect (default 5)")],
            &[],
        ),
        Capability::None,
        true,
        Arc::new(GetContextualRecommendations),
    ))?;

    registry.register(ToolDefinition::new(
        tn::DETECT_AND_CELEBRATE_MILESTONES,
        "Detect milestones earned by the accumulated usage history",
        JsonSchema::object(&[], &[]),
        Capability::None,
        true,
        Arc::new(DetectAndCelebrateMilestones),
    ))?;

    registry.register(ToolDefinition::new(
        tn::GET_RESEARCH_ACT_GUIDANCE,
        "Experience-adapted guidance for a target research act",
        JsonSchema::object(
            &[
                ("target_act", "string", "Act name (canonical or historical alias)"),
                ("experience_level", "string", "beginner, intermediate, or expert"),
            ],
            &["target_act"],
        ),
        Capability::None,
        true,
        Arc::new(GetResearchActGuidance),
    ))?;

    registry.register(ToolDefinition::new(
        tn::ANALYZE_RESEARCH_JOURNEY,
        "Journey analytics: timeline, domain evolution, productivity, predictions",
        JsonSchema::object(
            &[
                ("time_period", "string", "last_week, last_month, or all_time"),
                ("include_predictions", "boolean", "Predict the next research act"),
            ],
            &[],
        ),
        Capability::None,
        true,
        Arc::new(AnalyzeResearchJourney),
    ))?;

    registry.register(ToolDefinition::new(
        tn::GET_TOOL_USAGE_VELOCITY,
        "Invocations-per-day over a rolling window with a sparkline",
        JsonSchema::object(
            &[("window_days", "integer", "Window length in days (default 7)")],
            &[],
        ),
        Capability::None,
        true,
        Arc::new(GetToolUsageVelocity),
    ))?;

    registry.register(ToolDefinition::new(
        tn::GET_SESSION_SUMMARY,
        "Summary of the connection's active research session",
        JsonSchema::object(&[], &[]),
        Capability::None,
        true,
        Arc::new(GetSessionSummary),
    ))?;

    Ok(())
}

struct GetResearchProgress;

#[async_trait]
impl super::ToolHandler for GetResearchProgress {
    async fn call(&self, ctx: &ToolContext, _args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let usage = ctx.project.store.usage_samples().await?;
        let report = progress::compute_progress(&ctx.resources.framework, &usage);
        let markdown = progress::render_markdown(&report);

        Ok(ToolOutput::Json(json!({
            "report": report,
            "markdown": markdown,
        })))
    }
}

struct GetContextualRecommendations;

#[async_trait]
impl super::ToolHandler for GetContextualRecommendations {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let lookback = optional_usize(args, "lookback", defaults::RECOMMENDATION_LOOKBACK);

        let mut recent: Vec<String> = ctx
            .project
            .store
            .recent_usage(lookback as i64)
            .await?
            .into_iter()
            .map(|u| u.tool_name)
            .collect();
        recent.reverse(); // oldest first

        let all_used: HashSet<String> = ctx
            .project
            .store
            .distinct_tool_names()
            .await?
            .into_iter()
            .collect();

        let recs = recommendations::contextual_recommendations(
            &ctx.resources.framework,
            &recent,
            &all_used,
        );
        Ok(ToolOutput::Json(serde_json::to_value(recs)?))
    }
}

struct DetectAndCelebrateMilestones;

#[async_trait]
impl super::ToolHandler for DetectAndCelebrateMilestones {
    async fn call(&self, ctx: &ToolContext, _args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let usage = ctx.project.store.usage_samples().await?;
        let detected =
            milestones::detect_milestones(&ctx.resources.framework, &usage, Utc::now().date_naive());

        if detected.is_empty() {
            return Ok(ToolOutput::Json(json!({
                "milestones": [milestones::neutral_response()],
                "celebration": false,
            })));
        }
        Ok(ToolOutput::Json(json!({
            "milestones": detected,
            "celebration": true,
        })))
    }
}

struct GetResearchActGuidance;

#[async_trait]
impl super::ToolHandler for GetResearchActGuidance {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let act_name = super::required_str(args, "target_act")?;
        let act = ResearchAct::parse(act_name)
            .ok_or_else(|| AppError::validation(format!("unknown research act '{act_name}'")))?;
        let level =
            ExperienceLevel::parse_or_default(optional_str(args, "experience_level").unwrap_or(""));

        let used: HashSet<String> = ctx
            .project
            .store
            .distinct_tool_names()
            .await?
            .into_iter()
            .collect();

        let guidance = guidance::act_guidance(&ctx.resources.framework, act, level, &used);
        Ok(ToolOutput::Json(serde_json::to_value(guidance)?))
    }
}

struct AnalyzeResearchJourney;

#[async_trait]
impl super::ToolHandler for AnalyzeResearchJourney {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let period =
            TimePeriod::parse_or_default(optional_str(args, "time_period").unwrap_or("all_time"));
        let include_predictions = optional_bool(args, "include_predictions", false);

        let usage = ctx.project.store.usage_samples().await?;
        let interactions = ctx.project.store.interaction_samples().await?;

        let report = journey::analyze_journey(
            &ctx.resources.framework,
            &usage,
            &interactions,
            period,
            Utc::now(),
            include_predictions,
        );
        Ok(ToolOutput::Json(serde_json::to_value(report)?))
    }
}

struct GetToolUsageVelocity;

#[async_trait]
impl super::ToolHandler for GetToolUsageVelocity {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let window = optional_usize(args, "window_days", defaults::VELOCITY_WINDOW_DAYS as usize);

        let usage = ctx.project.store.usage_samples().await?;
        let report = velocity::compute_velocity(&usage, window as u32, Utc::now().date_naive());
        Ok(ToolOutput::Json(serde_json::to_value(report)?))
    }
}

struct GetSessionSummary;

#[async_trait]
impl super::ToolHandler for GetSessionSummary {
    async fn call(&self, ctx: &ToolContext, _args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let slot = ctx.session_slot.read().await.clone();
        let session = match slot {
            Some((root, session_id)) if root == ctx.project.root => {
                ctx.project.store.session_by_id(session_id).await?
            }
            _ => ctx.project.store.latest_active_session().await?,
        };

        let Some(session) = session else {
            return Ok(ToolOutput::Json(json!({
                "active_session": false,
                "hint": "Run start_research_session to begin tracking.",
            })));
        };

        let recent_tools = ctx
            .project
            .store
            .recent_tools_for_session(session.id, 10)
            .await?;
        let interactions = ctx.project.store.interactions_for_session(session.id).await?;

        Ok(ToolOutput::Json(json!({
            "active_session": session.status == "active",
            "session_id": session.id,
            "session_type": session.session_type,
            "started_at": session.started_at.to_rfc3339(),
            "recent_tools": recent_tools,
            "interaction_count": interactions.len(),
        })))
    }
}
