// ABOUTME: Design and planning tools for methodology selection and design validation
// ABOUTME: Methodology advice, approach comparison, validity threats, and ethics review
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::{optional_str, required_str, ToolContext, ToolDefinition, ToolOutput, ToolRegistry};
use crate::capabilities::Capability;
use crate::errors::{AppError, AppResult};
use crate::mcp::schema::JsonSchema;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use srrd_intelligence::framework::tool_names as tn;
use std::sync::Arc;

/// Register the design-planning tools.
///
/// # Errors
///
/// Propagates duplicate-name registration errors.
pub fn register(registry: &mut ToolRegistry) -> AppResult<()> {
    registry.register(ToolDefinition::new(
        tn::SUGGEST_METHODOLOGY,
        "Recommend candidate methodologies for stated research goals",
        JsonSchema::object(
            &[
                ("research_goals", "string", "The goals the methodology must serve"),
                ("domain", "string", "Domain tag when known"),
                ("constraints", "string", "Time, data, or resource constraints"),
            ],
            &["research_goals"],
        ),
        Capability::None,
        false,
        Arc::new(SuggestMethodology),
    ))?;

    registry.register(ToolDefinition::new(
        tn::EXPLAIN_METHODOLOGY,
        "Explain a named methodology, its strengths, and where it breaks down",
        JsonSchema::object(
            &[("methodology", "string", "Methodology name to explain")],
            &["methodology"],
        ),
        Capability::None,
        false,
        Arc::new(ExplainMethodology),
    ))?;

    registry.register(ToolDefinition::new(
        tn::COMPARE_APPROACHES,
        "Compare two candidate approaches on fit, cost, and risk",
        JsonSchema::object(
            &[
                ("approach_a", "string", "First approach"),
                ("approach_b", "string", "Second approach"),
                ("research_goals", "string", "Goals the comparison is judged against"),
            ],
            &["approach_a", "approach_b"],
        ),
        Capability::None,
        false,
        Arc::new(CompareApproaches),
    ))?;

    registry.register(ToolDefinition::new(
        tn::VALIDATE_DESIGN,
        "Check an experimental design for common validity threats",
        JsonSchema::object(
            &[
                ("design_description", "string", "The study design to check"),
                ("methodology", "string", "Methodology the design implements"),
            ],
            &["design_description"],
        ),
        Capability::None,
        false,
        Arc::new(ValidateDesign),
    ))?;

    registry.register(ToolDefinition::new(
        tn::ENSURE_ETHICS,
        "Review the ethical considerations a design must address",
        JsonSchema::object(
            &[("design_description", "string", "The study design to review")],
            &["design_description"],
        ),
        Capability::None,
        false,
        Arc::new(EnsureEthics),
    ))?;

    Ok(())
}

const METHODOLOGIES: &[(&str, &str, &str, &str)] = &[
    (
        "experimental",
        "Controlled manipulation of variables with randomized assignment",
        "Strong causal claims, repeatable protocols",
        "Breaks down when manipulation is infeasible or unethical",
    ),
    (
        "computational_modeling",
        "Formal models executed as simulations and compared against observations",
        "Cheap iteration, explicit assumptions, parameter sweeps",
        "Breaks down when the model's idealizations dominate the phenomenon",
    ),
    (
        "observational",
        "Systematic measurement without intervention",
        "Reaches phenomena experiments cannot touch",
        "Confounding limits causal interpretation",
    ),
    (
        "theoretical",
        "Derivation of consequences from stated axioms or principles",
        "Generality and precision; results survive instrument changes",
        "Breaks down when axioms drift from the empirical situation",
    ),
    (
        "mixed_methods",
        "Sequenced qualitative and quantitative phases informing each other",
        "Triangulation; mechanisms plus magnitudes",
        "Costly, and integration across phases is often underspecified",
    ),
];

struct SuggestMethodology;

#[async_trait]
impl super::ToolHandler for SuggestMethodology {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let goals = required_str(args, "research_goals")?;
        let constraints = optional_str(args, "constraints");
        let lower = goals.to_lowercase();

        // Cheap fit heuristics; the researcher makes the call.
        let mut ranked: Vec<&(&str, &str, &str, &str)> = METHODOLOGIES.iter().collect();
        ranked.sort_by_key(|(name, ..)| {
            let mut rank = 10;
            if lower.contains("caus") || lower.contains("effect") {
                if *name == "experimental" {
                    rank = 0;
                }
            } else if lower.contains("simulat") || lower.contains("model") {
                if *name == "computational_modeling" {
                    rank = 0;
                }
            } else if lower.contains("prove") || lower.contains("derive") || lower.contains("theor")
            {
                if *name == "theoretical" {
                    rank = 0;
                }
            } else if (lower.contains("field") || lower.contains("observ"))
                && *name == "observational"
            {
                rank = 0;
            }
            rank
        });

        let candidates: Vec<Value> = ranked
            .iter()
            .take(3)
            .map(|(name, summary, strengths, limits)| {
                json!({
                    "methodology": name,
                    "summary": summary,
                    "strengths": strengths,
                    "limitations": limits,
                })
            })
            .collect();

        Ok(ToolOutput::Json(json!({
            "research_goals": goals,
            "constraints": constraints,
            "candidates": candidates,
            "next_step": "Run validate_design once a candidate is drafted into a concrete design.",
        })))
    }
}

struct ExplainMethodology;

#[async_trait]
impl super::ToolHandler for ExplainMethodology {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let name = required_str(args, "methodology")?;
        let key = name.to_lowercase().replace([' ', '-'], "_");

        let found = METHODOLOGIES
            .iter()
            .find(|(candidate, ..)| *candidate == key);
        match found {
            Some((methodology, summary, strengths, limits)) => Ok(ToolOutput::Json(json!({
                "methodology": methodology,
                "summary": summary,
                "strengths": strengths,
                "limitations": limits,
            }))),
            None => Err(AppError::validation(format!(
                "unknown methodology '{name}'; known: {}",
                METHODOLOGIES
                    .iter()
                    .map(|(n, ..)| *n)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

struct CompareApproaches;

#[async_trait]
impl super::ToolHandler for CompareApproaches {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let a = required_str(args, "approach_a")?;
        let b = required_str(args, "approach_b")?;
        let goals = optional_str(args, "research_goals").unwrap_or("the stated goals");

        Ok(ToolOutput::Json(json!({
            "dimensions": [
                {
                    "dimension": "fit",
                    "question": format!("Which of '{a}' and '{b}' answers {goals} more directly, with fewer auxiliary assumptions?")
                },
                {
                    "dimension": "cost",
                    "question": "Which reaches a publishable negative result sooner if the idea is wrong?"
                },
                {
                    "dimension": "risk",
                    "question": "Which fails more informatively - and which fails silently?"
                },
                {
                    "dimension": "reviewability",
                    "question": "For which can a skeptical reviewer re-derive every step from what you will report?"
                }
            ],
            "guidance": "Fill the grid with one sentence per cell before choosing; a column of blanks is itself an answer.",
        })))
    }
}

const VALIDITY_THREATS: &[(&str, &str)] = &[
    ("selection", "Does anything about how cases enter the study correlate with the outcome?"),
    ("confounding", "What third variable moves both the manipulated and the measured quantity?"),
    ("measurement", "Would a different but defensible instrument give a different conclusion?"),
    ("attrition", "Who drops out before measurement, and are they different from who stays?"),
    ("power", "If the true effect is half your guess, does the design still detect it?"),
];

struct ValidateDesign;

#[async_trait]
impl super::ToolHandler for ValidateDesign {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let description = required_str(args, "design_description")?;
        let threats: Vec<Value> = VALIDITY_THREATS
            .iter()
            .map(|(threat, probe)| json!({ "threat": threat, "probe": probe }))
            .collect();

        Ok(ToolOutput::Json(json!({
            "design": description.chars().take(200).collect::<String>(),
            "validity_threats": threats,
            "verdict": "Address each probe in writing; unanswered probes are the review's findings in advance.",
        })))
    }
}

struct EnsureEthics;

#[async_trait]
impl super::ToolHandler for EnsureEthics {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let description = required_str(args, "design_description")?;
        let lower = description.to_lowercase();

        let mut considerations = vec![
            "Data provenance: is every dataset used under terms that permit this analysis?".to_owned(),
            "Reporting: can all results, including null results, be published without restriction?".to_owned(),
        ];
        if lower.contains("participant") || lower.contains("subject") || lower.contains("human") {
            considerations.push(
                "Human subjects: informed consent, withdrawal rights, and IRB/ethics-board approval are required before collection.".to_owned(),
            );
            considerations.push(
                "Privacy: identify every field that could re-identify a participant when joined with public data.".to_owned(),
            );
        }
        if lower.contains("animal") {
            considerations
                .push("Animal welfare: institutional approval and the 3Rs analysis are required.".to_owned());
        }

        Ok(ToolOutput::Json(json!({
            "considerations": considerations,
            "required_before_data_collection": lower.contains("participant")
                || lower.contains("subject")
                || lower.contains("human")
                || lower.contains("animal"),
        })))
    }
}
