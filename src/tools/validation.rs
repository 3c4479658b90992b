// ABOUTME: Validation and refinement tools for review, quality gates, and paradigm work
// ABOUTME: Novel-theory tools persist theories and comparisons with equal-treatment scoring
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use super::{optional_str, required_str, ToolContext, ToolDefinition, ToolOutput, ToolRegistry};
use crate::capabilities::Capability;
use crate::database::theories::NewNovelTheory;
use crate::errors::AppResult;
use crate::mcp::schema::JsonSchema;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use srrd_intelligence::analyzer;
use srrd_intelligence::framework::tool_names as tn;
use std::sync::Arc;

/// Register the validation-refinement tools.
///
/// # Errors
///
/// Propagates duplicate-name registration errors.
pub fn register(registry: &mut ToolRegistry) -> AppResult<()> {
    registry.register(ToolDefinition::new(
        tn::SIMULATE_PEER_REVIEW,
        "Simulate a peer review of supplied content",
        JsonSchema::object(
            &[
                ("content", "string", "Content to review"),
                ("venue", "string", "Target venue, when known"),
            ],
            &["content"],
        ),
        Capability::None,
        false,
        Arc::new(SimulatePeerReview),
    ))?;

    registry.register(ToolDefinition::new(
        tn::ENHANCED_SOCRATIC_DIALOGUE,
        "Deepen the current understanding through progressive Socratic dialogue",
        JsonSchema::object(
            &[
                ("current_understanding", "string", "The position under examination"),
                ("user_response", "string", "Answer to the previous round, if any"),
                ("depth", "integer", "Dialogue depth reached so far"),
            ],
            &["current_understanding"],
        ),
        Capability::None,
        false,
        Arc::new(EnhancedSocraticDialogue),
    ))?;

    registry.register(ToolDefinition::new(
        tn::CHECK_QUALITY_GATES,
        "Run publication-readiness quality gates and persist the result",
        JsonSchema::object(
            &[
                ("content", "string", "Content the gates run against"),
                ("phase", "string", "Gate set to apply (draft, submission)"),
            ],
            &["content"],
        ),
        Capability::None,
        true,
        Arc::new(CheckQualityGates),
    ))?;

    registry.register(ToolDefinition::new(
        tn::INITIATE_PARADIGM_CHALLENGE,
        "Open a structured challenge to a mainstream paradigm",
        JsonSchema::object(
            &[
                ("mainstream_paradigm", "string", "The framing being challenged"),
                ("challenge_description", "string", "Grounds of the challenge"),
            ],
            &["mainstream_paradigm", "challenge_description"],
        ),
        Capability::None,
        true,
        Arc::new(InitiateParadigmChallenge),
    ))?;

    registry.register(ToolDefinition::new(
        tn::DEVELOP_ALTERNATIVE_FRAMEWORK,
        "Develop an alternative theoretical framework and persist it",
        JsonSchema::object(
            &[
                ("theory_name", "string", "Name of the alternative framework"),
                ("theory_description", "string", "Core principles"),
                ("mainstream_comparison", "string", "What it replaces or extends"),
            ],
            &["theory_name", "theory_description"],
        ),
        Capability::None,
        true,
        Arc::new(DevelopAlternativeFramework),
    ))?;

    registry.register(ToolDefinition::new(
        tn::COMPARE_PARADIGMS,
        "Compare mainstream and alternative paradigms with equal treatment",
        JsonSchema::object(
            &[
                ("mainstream_paradigm", "string", "Mainstream framing"),
                ("alternative_paradigm", "string", "Alternative framing"),
            ],
            &["mainstream_paradigm", "alternative_paradigm"],
        ),
        Capability::None,
        true,
        Arc::new(CompareParadigms),
    ))?;

    registry.register(ToolDefinition::new(
        tn::VALIDATE_NOVEL_THEORY,
        "Validate a novel theory against standard criteria",
        JsonSchema::object(
            &[
                ("theory_name", "string", "Theory under validation"),
                ("theory_description", "string", "Core principles and claims"),
            ],
            &["theory_name", "theory_description"],
        ),
        Capability::None,
        true,
        Arc::new(ValidateNovelTheory),
    ))?;

    registry.register(ToolDefinition::new(
        tn::EVALUATE_PARADIGM_SHIFT_POTENTIAL,
        "Assess the paradigm-shift potential of a theory",
        JsonSchema::object(
            &[("theory_description", "string", "Theory to assess")],
            &["theory_description"],
        ),
        Capability::None,
        false,
        Arc::new(EvaluateParadigmShiftPotential),
    ))?;

    registry.register(ToolDefinition::new(
        tn::CULTIVATE_INNOVATION,
        "Foster innovative directions branching from the current work",
        JsonSchema::object(
            &[("research_context", "string", "Current state of the work")],
            &["research_context"],
        ),
        Capability::None,
        false,
        Arc::new(CultivateInnovation),
    ))?;

    Ok(())
}

const REVIEW_LENSES: &[(&str, &str)] = &[
    ("novelty", "What here could not have been written three years ago?"),
    ("rigor", "Which claim has the thinnest evidence, and does the text admit it?"),
    ("clarity", "Can a reader reconstruct the method from the text alone?"),
    ("significance", "Who changes their work based on this result?"),
    ("reproducibility", "What would an independent group need that the text does not provide?"),
];

struct SimulatePeerReview;

#[async_trait]
impl super::ToolHandler for SimulatePeerReview {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let content = required_str(args, "content")?;
        let venue = optional_str(args, "venue");

        let fields = analyzer::free_text_fields(args);
        let analysis = analyzer::analyze(tn::SIMULATE_PEER_REVIEW, &fields);

        let findings: Vec<Value> = REVIEW_LENSES
            .iter()
            .map(|(lens, question)| json!({ "lens": lens, "question": question }))
            .collect();

        let mut notes = Vec::new();
        if analysis.specificity_score < 0.2 {
            notes.push(
                "Low specificity: the draft leans on qualitative claims; reviewers will ask for numbers.",
            );
        }
        if analysis.uncertainty_markers > 3 {
            notes.push("Frequent hedging; convert hedges into explicit limitations.");
        }
        if content.split_whitespace().count() < 100 {
            notes.push("The excerpt is short; a full review needs the complete draft.");
        }

        Ok(ToolOutput::Json(json!({
            "venue": venue,
            "review_findings": findings,
            "automated_notes": notes,
            "word_count": analysis.word_count,
        })))
    }
}

struct EnhancedSocraticDialogue;

#[async_trait]
impl super::ToolHandler for EnhancedSocraticDialogue {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let understanding = required_str(args, "current_understanding")?;
        let user_response = optional_str(args, "user_response");
        let depth = args.get("depth").and_then(Value::as_u64).unwrap_or(0);

        // Rounds progress from grounds, to implications, to limits.
        let question = match depth {
            0 => format!(
                "You hold that \"{}\". What observation, not argument, most directly supports it?",
                truncate(understanding, 120)
            ),
            1 => "If that support vanished tomorrow, what is the next-strongest ground - and is it independent of the first?".to_owned(),
            2 => "Suppose the position is right. What surprising consequence follows that nobody has checked?".to_owned(),
            _ => "Where does the position stop applying? Describe the nearest case it gets wrong.".to_owned(),
        };

        let acknowledgement = user_response.map(|r| {
            format!(
                "Noted: \"{}\". The next question builds on that answer.",
                truncate(r, 120)
            )
        });

        Ok(ToolOutput::Json(json!({
            "depth": depth + 1,
            "acknowledgement": acknowledgement,
            "question": question,
        })))
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

struct CheckQualityGates;

#[async_trait]
impl super::ToolHandler for CheckQualityGates {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let content = required_str(args, "content")?;
        let phase = optional_str(args, "phase").unwrap_or("draft");

        let fields = analyzer::free_text_fields(args);
        let analysis = analyzer::analyze(tn::CHECK_QUALITY_GATES, &fields);

        let mut issues = Vec::new();
        if analysis.word_count < 200 {
            issues.push("below minimum substantive length for a draft gate");
        }
        if analysis.specificity_score < 0.1 {
            issues.push("no quantitative anchors (numbers, citations, units) detected");
        }
        if phase == "submission" && content.to_lowercase().contains("todo") {
            issues.push("unresolved TODO markers present at submission phase");
        }

        let result = if issues.is_empty() {
            "pass"
        } else if issues.len() == 1 {
            "warn"
        } else {
            "fail"
        };

        let issues_json = serde_json::to_string(&issues).unwrap_or_else(|_| "[]".to_owned());
        ctx.project
            .store
            .insert_quality_check(None, &format!("{phase}_readiness"), result, Some(&issues_json))
            .await?;

        Ok(ToolOutput::Json(json!({
            "phase": phase,
            "result": result,
            "issues": issues,
        })))
    }
}

struct InitiateParadigmChallenge;

#[async_trait]
impl super::ToolHandler for InitiateParadigmChallenge {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let mainstream = required_str(args, "mainstream_paradigm")?;
        let challenge = required_str(args, "challenge_description")?;

        let id = ctx
            .project
            .store
            .insert_paradigm_comparison(mainstream, challenge, None, None)
            .await?;

        Ok(ToolOutput::Json(json!({
            "comparison_id": id,
            "mainstream_paradigm": mainstream,
            "challenge_registered": true,
            "next_steps": [
                "State the mainstream paradigm's strongest successes in its own terms",
                "Identify the anomaly the challenge explains that the mainstream does not",
                "Run develop_alternative_framework to make the alternative concrete",
            ],
        })))
    }
}

struct DevelopAlternativeFramework;

#[async_trait]
impl super::ToolHandler for DevelopAlternativeFramework {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let name = required_str(args, "theory_name")?;
        let description = required_str(args, "theory_description")?;
        let comparison = optional_str(args, "mainstream_comparison");

        let id = ctx
            .project
            .store
            .insert_novel_theory(NewNovelTheory {
                theory_name: name,
                core_principles: description,
                mainstream_comparison: comparison,
                validation_results: None,
                equal_treatment_score: None,
                development_stage: "development",
            })
            .await?;

        Ok(ToolOutput::Json(json!({
            "theory_id": id,
            "theory_name": name,
            "development_stage": "development",
            "framework_prompts": [
                "Which phenomena does the framework treat as primitive, and which as derived?",
                "What does it predict where the mainstream is silent?",
                "What formalism will carry the principles once they stabilize?",
            ],
        })))
    }
}

/// Equal-treatment scoring: both paradigms are probed with the same
/// criteria; the score reflects symmetry of the inputs, not their merit.
fn equal_treatment_score(mainstream: &str, alternative: &str) -> f64 {
    let a = mainstream.split_whitespace().count() as f64;
    let b = alternative.split_whitespace().count() as f64;
    if a == 0.0 || b == 0.0 {
        return 0.0;
    }
    let ratio = (a.min(b) / a.max(b) * 100.0).round() / 100.0;
    ratio.clamp(0.0, 1.0)
}

struct CompareParadigms;

#[async_trait]
impl super::ToolHandler for CompareParadigms {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let mainstream = required_str(args, "mainstream_paradigm")?;
        let alternative = required_str(args, "alternative_paradigm")?;

        let criteria = [
            "explanatory scope",
            "predictive novelty",
            "consistency with adjacent theory",
            "parsimony",
            "empirical track record",
        ];
        let score = equal_treatment_score(mainstream, alternative);
        let results = json!({
            "criteria": criteria,
            "instruction": "Score both paradigms on every criterion before reading either column's total.",
        });

        let id = ctx
            .project
            .store
            .insert_paradigm_comparison(
                mainstream,
                alternative,
                Some(&results.to_string()),
                Some(score),
            )
            .await?;

        Ok(ToolOutput::Json(json!({
            "comparison_id": id,
            "equal_treatment_score": score,
            "comparison": results,
        })))
    }
}

struct ValidateNovelTheory;

#[async_trait]
impl super::ToolHandler for ValidateNovelTheory {
    async fn call(&self, ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let name = required_str(args, "theory_name")?;
        let description = required_str(args, "theory_description")?;

        let fields = analyzer::free_text_fields(args);
        let analysis = analyzer::analyze(tn::VALIDATE_NOVEL_THEORY, &fields);

        let checks = vec![
            json!({
                "criterion": "internal_consistency",
                "status": "open",
                "probe": "Derive two consequences from the core principles and check they do not conflict."
            }),
            json!({
                "criterion": "falsifiability",
                "status": if analysis.specificity_score > 0.15 { "promising" } else { "open" },
                "probe": "Name one observation that would refute the theory outright."
            }),
            json!({
                "criterion": "novel_prediction",
                "status": "open",
                "probe": "State a prediction the mainstream account does not make."
            }),
            json!({
                "criterion": "recoverability",
                "status": "open",
                "probe": "Show the mainstream results re-emerge as a limiting case."
            }),
        ];
        let validation = json!({ "checks": checks, "sophistication": analysis.sophistication_score });

        let id = ctx
            .project
            .store
            .insert_novel_theory(NewNovelTheory {
                theory_name: name,
                core_principles: description,
                mainstream_comparison: None,
                validation_results: Some(&validation.to_string()),
                equal_treatment_score: Some(1.0),
                development_stage: "validation",
            })
            .await?;

        Ok(ToolOutput::Json(json!({
            "theory_id": id,
            "theory_name": name,
            "validation": validation,
        })))
    }
}

struct EvaluateParadigmShiftPotential;

#[async_trait]
impl super::ToolHandler for EvaluateParadigmShiftPotential {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let description = required_str(args, "theory_description")?;

        let fields = analyzer::free_text_fields(args);
        let analysis = analyzer::analyze(tn::EVALUATE_PARADIGM_SHIFT_POTENTIAL, &fields);

        let indicators = json!({
            "anomaly_coverage": "Does the theory resolve a known anomaly the mainstream shelves?",
            "conceptual_cost": "How much adjacent theory must be rewritten if it is right?",
            "community_readiness": "Is there an unexplained result the field is actively bothered by?",
        });

        Ok(ToolOutput::Json(json!({
            "novel_theory_indicators": analysis.novel_theory_indicators,
            "sophistication_score": analysis.sophistication_score,
            "shift_indicators": indicators,
            "assessment": "Paradigm shifts are recognized in retrospect; the actionable question is whether the anomaly is real and the prediction is new.",
            "description_length": description.chars().count(),
        })))
    }
}

struct CultivateInnovation;

#[async_trait]
impl super::ToolHandler for CultivateInnovation {
    async fn call(&self, _ctx: &ToolContext, args: &Map<String, Value>) -> AppResult<ToolOutput> {
        let context = required_str(args, "research_context")?;

        Ok(ToolOutput::Json(json!({
            "context": truncate(context, 200),
            "prompts": [
                "Invert the central assumption and describe the world where the inversion holds.",
                "Transplant the core method into the neighboring field where it has never been applied.",
                "Take the most annoying limitation and treat it as the object of study instead of a nuisance.",
                "Ask what a tenth of the budget would force you to discover.",
            ],
        })))
    }
}
