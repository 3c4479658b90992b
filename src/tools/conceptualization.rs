// ABOUTME: Conceptualization tools for goal clarification and critical thinking
// ABOUTME: Socratic questioning over research goals, assumptions, and framing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::{optional_str, required_str, ToolContext, ToolDefinition, ToolOutput, ToolRegistry};
use crate::capabilities::Capability;
use crate::errors::AppResult;
use crate::mcp::schema::JsonSchema;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use srrd_intelligence::analyzer;
use srrd_intelligence::framework::tool_names as tn;
use std::sync::Arc;

/// Register the conceptualization tools.
///
/// # Errors
///
/// Propagates duplicate-name registration errors.
pub fn register(registry: &mut ToolRegistry) -> AppResult<()> {
    registry.register(ToolDefinition::new(
        tn::CLARIFY_RESEARCH_GOALS,
        "Clarify research goals through Socratic questioning tailored to the research area",
        JsonSchema::object(
            &[
                ("research_area", "string", "The research area under study"),
                ("initial_goals", "string", "Current formulation of the goals"),
                ("experience_level", "string", "beginner, intermediate, or expert"),
            ],
            &["research_area"],
        ),
        Capability::None,
        false,
        Arc::new(ClarifyResearchGoals),
    ))?;

    registry.register(ToolDefinition::new(
        tn::ASSESS_FOUNDATIONAL_ASSUMPTIONS,
        "Surface and examine the foundational assumptions behind a research framing",
        JsonSchema::object(
            &[
                ("research_context", "string", "Description of the research framing"),
                ("domain", "string", "Domain tag when known"),
            ],
            &["research_context"],
        ),
        Capability::None,
        false,
        Arc::new(AssessFoundationalAssumptions),
    ))?;

    registry.register(ToolDefinition::new(
        tn::GENERATE_CRITICAL_QUESTIONS,
        "Generate critical questions that stress-test the current research framing",
        JsonSchema::object(
            &[
                ("research_context", "string", "Description of the research framing"),
                ("focus", "string", "Optional aspect to probe hardest"),
            ],
            &["research_context"],
        ),
        Capability::None,
        false,
        Arc::new(GenerateCriticalQuestions),
    ))?;

    Ok(())
}

struct ClarifyResearchGoals;

#[async_trait]
impl super::ToolHandler for ClarifyResearchGoals {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let research_area = required_str(args, "research_area")?;
        let initial_goals = optional_str(args, "initial_goals").unwrap_or("");

        let fields = analyzer::free_text_fields(args);
        let analysis = analyzer::analyze(tn::CLARIFY_RESEARCH_GOALS, &fields);

        let mut questions = vec![
            format!("What specific outcome in {research_area} would tell you the work succeeded?"),
            "Who needs this answer, and what will they do differently once they have it?".to_owned(),
            "Which part of the goal could you drop and still call the project worthwhile?".to_owned(),
        ];
        if initial_goals.is_empty() {
            questions.push(
                "Try stating the goal as a single falsifiable sentence; what resists that form?"
                    .to_owned(),
            );
        } else {
            questions.push(format!(
                "Your stated goal is \"{initial_goals}\". What evidence would show it was the wrong goal?"
            ));
        }
        if analysis.primary_domain != "interdisciplinary" {
            questions.push(format!(
                "Which {} result, if overturned tomorrow, would invalidate this direction?",
                analysis.primary_domain
            ));
        }

        Ok(ToolOutput::Json(json!({
            "research_area": research_area,
            "primary_domain": analysis.primary_domain,
            "clarifying_questions": questions,
            "next_step": "Answer these, then run suggest_methodology with the sharpened goals.",
        })))
    }
}

struct AssessFoundationalAssumptions;

#[async_trait]
impl super::ToolHandler for AssessFoundationalAssumptions {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let context = required_str(args, "research_context")?;
        let lower = context.to_lowercase();

        let mut assumptions = vec![
            json!({
                "assumption": "The phenomenon under study is stable enough to measure repeatedly",
                "probe": "What would a failed replication mean for the framing?"
            }),
            json!({
                "assumption": "The chosen vocabulary carves the problem at its joints",
                "probe": "Rename the two central terms; does the question survive?"
            }),
        ];
        if lower.contains("caus") {
            assumptions.push(json!({
                "assumption": "The causal arrow points the direction the framing presumes",
                "probe": "Sketch the reverse-causation story; what data would rule it out?"
            }));
        }
        if lower.contains("measure") || lower.contains("metric") || lower.contains("score") {
            assumptions.push(json!({
                "assumption": "The measurement instrument tracks the construct of interest",
                "probe": "What else moves the instrument that is not the construct?"
            }));
        }

        Ok(ToolOutput::Json(json!({
            "assumptions": assumptions,
            "guidance": "Write each assumption down with the evidence you currently have for it. \
                         An assumption with no evidence is a research question in disguise.",
        })))
    }
}

struct GenerateCriticalQuestions;

#[async_trait]
impl super::ToolHandler for GenerateCriticalQuestions {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let context = required_str(args, "research_context")?;
        let focus = optional_str(args, "focus");

        let mut questions = vec![
            "What is the strongest objection a hostile reviewer would raise, and is it answerable today?".to_owned(),
            "If the expected result fails to appear, what is the most informative way for it to fail?".to_owned(),
            "Which prior work does this quietly contradict, and has that been confronted?".to_owned(),
            "What would convince you to abandon this line entirely?".to_owned(),
        ];
        if let Some(focus) = focus {
            questions.insert(
                0,
                format!("Regarding {focus}: what known result constrains it most tightly?"),
            );
        }

        Ok(ToolOutput::Json(json!({
            "research_context": context.chars().take(200).collect::<String>(),
            "critical_questions": questions,
        })))
    }
}
