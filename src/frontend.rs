// ABOUTME: Frontend contract: static tool catalog metadata and per-tool default arguments
// ABOUTME: Browser UIs validate that both maps cover every registered tool on load
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Frontend Contract
//!
//! UIs consume two static maps: catalog metadata (title, purpose, usage,
//! examples, tags) and default argument values for try-it buttons. Both must
//! be supersets of the server's registered tool names under the active
//! capabilities; [`validate_against_registry`] reports any gap so a UI can
//! log it on load.

use crate::tools::ToolRegistry;
use serde::Serialize;
use serde_json::{json, Value};
use srrd_intelligence::framework::tool_names as tn;
use std::collections::HashMap;
use tracing::warn;

/// Catalog metadata for one tool.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    /// Tool name (registry key)
    pub name: &'static str,
    /// Display title
    pub title: &'static str,
    /// What the tool is for
    pub purpose: &'static str,
    /// When to reach for it
    pub usage: &'static str,
    /// Tags for filtering in the UI
    pub tags: &'static [&'static str],
}

macro_rules! entry {
    ($name:expr, $title:expr, $purpose:expr, $usage:expr, $tags:expr) => {
        CatalogEntry {
            name: $name,
            title: $title,
            purpose: $purpose,
            usage: $usage,
            tags: $tags,
        }
    };
}

/// The full static catalog, a superset of every registerable tool.
#[must_use]
pub fn tool_catalog() -> Vec<CatalogEntry> {
    vec![
        entry!(tn::CLARIFY_RESEARCH_GOALS, "Clarify Research Goals", "Sharpen goals through Socratic questioning", "Start of a project, or whenever the goal drifts", &["conceptualization", "socratic"]),
        entry!(tn::ASSESS_FOUNDATIONAL_ASSUMPTIONS, "Assess Assumptions", "Surface the assumptions the framing rests on", "Before committing to a direction", &["conceptualization", "critical-thinking"]),
        entry!(tn::GENERATE_CRITICAL_QUESTIONS, "Critical Questions", "Stress-test the framing with hard questions", "After goals are drafted", &["conceptualization", "critical-thinking"]),
        entry!(tn::SUGGEST_METHODOLOGY, "Suggest Methodology", "Recommend methodologies that fit the goals", "Once goals are clear", &["design", "methodology"]),
        entry!(tn::EXPLAIN_METHODOLOGY, "Explain Methodology", "Explain a methodology's strengths and limits", "While choosing between candidates", &["design", "methodology"]),
        entry!(tn::COMPARE_APPROACHES, "Compare Approaches", "Compare two approaches on fit, cost, and risk", "When two designs look viable", &["design", "methodology"]),
        entry!(tn::VALIDATE_DESIGN, "Validate Design", "Check a design against validity threats", "Before data collection", &["design", "validation"]),
        entry!(tn::ENSURE_ETHICS, "Ethics Review", "Review required ethical considerations", "Before data collection", &["design", "ethics"]),
        entry!(tn::SEMANTIC_SEARCH, "Semantic Search", "Search the project knowledge base", "While gathering literature", &["knowledge", "search", "vector"]),
        entry!(tn::EXTRACT_KEY_CONCEPTS, "Key Concepts", "Extract salient concepts from text", "After reading a source", &["knowledge", "extraction"]),
        entry!(tn::STORE_BIBLIOGRAPHY_REFERENCE, "Store Reference", "Save a reference to the project store", "Whenever a source is worth keeping", &["knowledge", "bibliography"]),
        entry!(tn::RETRIEVE_BIBLIOGRAPHY_REFERENCES, "Retrieve References", "List stored references", "While writing or citing", &["knowledge", "bibliography"]),
        entry!(tn::EXTRACT_DOCUMENT_SECTIONS, "Document Sections", "Split a document into labeled sections", "When restructuring a draft", &["knowledge", "extraction"]),
        entry!(tn::DISCOVER_PATTERNS, "Discover Patterns", "Find recurring terms across the knowledge base", "Once several sources are stored", &["analysis", "vector"]),
        entry!(tn::FIND_SIMILAR_DOCUMENTS, "Similar Documents", "Find documents similar to an anchor", "When a source needs company", &["analysis", "vector"]),
        entry!(tn::BUILD_KNOWLEDGE_GRAPH, "Knowledge Graph", "Build a concept co-occurrence graph", "To map the territory", &["analysis", "vector"]),
        entry!(tn::GENERATE_RESEARCH_SUMMARY, "Research Summary", "Summarize accumulated material and progress", "End of a work phase", &["analysis", "synthesis"]),
        entry!(tn::SIMULATE_PEER_REVIEW, "Peer Review", "Simulate a review of supplied content", "Before submission", &["validation", "review"]),
        entry!(tn::ENHANCED_SOCRATIC_DIALOGUE, "Socratic Dialogue", "Deepen understanding through dialogue rounds", "When a position feels settled too soon", &["validation", "socratic"]),
        entry!(tn::CHECK_QUALITY_GATES, "Quality Gates", "Run publication-readiness gates", "Before each submission step", &["validation", "quality"]),
        entry!(tn::INITIATE_PARADIGM_CHALLENGE, "Paradigm Challenge", "Open a structured paradigm challenge", "When the mainstream account fails you", &["novel-theory"]),
        entry!(tn::DEVELOP_ALTERNATIVE_FRAMEWORK, "Alternative Framework", "Develop and persist an alternative framework", "After a challenge is registered", &["novel-theory"]),
        entry!(tn::COMPARE_PARADIGMS, "Compare Paradigms", "Equal-treatment paradigm comparison", "When both accounts are concrete", &["novel-theory"]),
        entry!(tn::VALIDATE_NOVEL_THEORY, "Validate Novel Theory", "Validate a theory against standard criteria", "Before arguing for the theory in public", &["novel-theory", "validation"]),
        entry!(tn::EVALUATE_PARADIGM_SHIFT_POTENTIAL, "Shift Potential", "Assess paradigm-shift indicators", "To calibrate ambitions", &["novel-theory"]),
        entry!(tn::CULTIVATE_INNOVATION, "Cultivate Innovation", "Generate innovative directions", "When progress plateaus", &["novel-theory", "creativity"]),
        entry!(tn::GENERATE_LATEX_DOCUMENT, "Generate LaTeX", "Generate a LaTeX document skeleton", "Start of the writing phase", &["publication", "latex"]),
        entry!(tn::COMPILE_LATEX, "Compile LaTeX", "Compile project LaTeX to PDF", "After each writing pass", &["publication", "latex"]),
        entry!(tn::LIST_LATEX_TEMPLATES, "LaTeX Templates", "List available document templates", "Before generating a document", &["publication", "latex"]),
        entry!(tn::FORMAT_RESEARCH_CONTENT, "Format Content", "Normalize content formatting", "Before sharing notes", &["publication", "formatting"]),
        entry!(tn::GENERATE_BIBLIOGRAPHY, "Generate Bibliography", "Render stored references as a bibliography", "While assembling the manuscript", &["publication", "bibliography"]),
        entry!(tn::INITIALIZE_PROJECT, "Initialize Project", "Turn a directory into a research project", "Once per project", &["project"]),
        entry!(tn::SWITCH_PROJECT_CONTEXT, "Switch Context", "Point this connection at another project", "When juggling projects", &["project", "context"]),
        entry!(tn::RESET_PROJECT_CONTEXT, "Reset Context", "Clear the connection's context override", "To return to ambient resolution", &["project", "context"]),
        entry!(tn::START_RESEARCH_SESSION, "Start Session", "Open a session for interaction grouping", "Start of a sitting", &["project", "session"]),
        entry!(tn::GET_RESEARCH_PROGRESS, "Research Progress", "Per-act progress with completion bars", "Weekly, or when lost", &["continuity", "progress"]),
        entry!(tn::GET_CONTEXTUAL_RECOMMENDATIONS, "Recommendations", "Pattern-aware next-tool recommendations", "When unsure what to do next", &["continuity"]),
        entry!(tn::DETECT_AND_CELEBRATE_MILESTONES, "Milestones", "Detect milestones earned so far", "Whenever morale needs data", &["continuity"]),
        entry!(tn::GET_RESEARCH_ACT_GUIDANCE, "Act Guidance", "Experience-adapted guidance for an act", "Entering an unfamiliar phase", &["continuity", "guidance"]),
        entry!(tn::ANALYZE_RESEARCH_JOURNEY, "Research Journey", "Timeline, domains, and productivity analytics", "Retrospectives", &["continuity", "analytics"]),
        entry!(tn::GET_TOOL_USAGE_VELOCITY, "Usage Velocity", "Invocations per day with a sparkline", "Pace checks", &["continuity", "analytics"]),
        entry!(tn::GET_SESSION_SUMMARY, "Session Summary", "Summary of the active session", "End of a sitting", &["continuity", "session"]),
    ]
}

/// Default arguments per tool for UI try-it buttons.
#[must_use]
pub fn default_arguments() -> HashMap<&'static str, Value> {
    let mut defaults = HashMap::new();
    defaults.insert(tn::CLARIFY_RESEARCH_GOALS, json!({ "research_area": "quantum computing", "initial_goals": "explore post-quantum cryptography" }));
    defaults.insert(tn::ASSESS_FOUNDATIONAL_ASSUMPTIONS, json!({ "research_context": "error-corrected quantum computation at scale" }));
    defaults.insert(tn::GENERATE_CRITICAL_QUESTIONS, json!({ "research_context": "error-corrected quantum computation at scale" }));
    defaults.insert(tn::SUGGEST_METHODOLOGY, json!({ "research_goals": "measure decoherence effects in superconducting qubits" }));
    defaults.insert(tn::EXPLAIN_METHODOLOGY, json!({ "methodology": "experimental" }));
    defaults.insert(tn::COMPARE_APPROACHES, json!({ "approach_a": "surface codes", "approach_b": "bosonic codes" }));
    defaults.insert(tn::VALIDATE_DESIGN, json!({ "design_description": "randomized benchmark across two qubit batches" }));
    defaults.insert(tn::ENSURE_ETHICS, json!({ "design_description": "simulation study, no human participants" }));
    defaults.insert(tn::SEMANTIC_SEARCH, json!({ "query": "error correction thresholds" }));
    defaults.insert(tn::EXTRACT_KEY_CONCEPTS, json!({ "content": "Surface codes tolerate higher error rates than concatenated codes." }));
    defaults.insert(tn::STORE_BIBLIOGRAPHY_REFERENCE, json!({ "title": "Polynomial-Time Algorithms for Prime Factorization", "authors": "P. Shor", "year": 1997 }));
    defaults.insert(tn::RETRIEVE_BIBLIOGRAPHY_REFERENCES, json!({}));
    defaults.insert(tn::EXTRACT_DOCUMENT_SECTIONS, json!({ "content": "# Introduction\ntext\n# Methods\ntext" }));
    defaults.insert(tn::DISCOVER_PATTERNS, json!({}));
    defaults.insert(tn::FIND_SIMILAR_DOCUMENTS, json!({ "document_id": 1 }));
    defaults.insert(tn::BUILD_KNOWLEDGE_GRAPH, json!({}));
    defaults.insert(tn::GENERATE_RESEARCH_SUMMARY, json!({}));
    defaults.insert(tn::SIMULATE_PEER_REVIEW, json!({ "content": "We demonstrate a 2x improvement in logical error rate." }));
    defaults.insert(tn::ENHANCED_SOCRATIC_DIALOGUE, json!({ "current_understanding": "Decoherence is the dominant obstacle to scaling." }));
    defaults.insert(tn::CHECK_QUALITY_GATES, json!({ "content": "Draft abstract with preliminary results.", "phase": "draft" }));
    defaults.insert(tn::INITIATE_PARADIGM_CHALLENGE, json!({ "mainstream_paradigm": "decoherence-limited scaling", "challenge_description": "error floors trace to control electronics, not decoherence" }));
    defaults.insert(tn::DEVELOP_ALTERNATIVE_FRAMEWORK, json!({ "theory_name": "control-noise ceiling", "theory_description": "scaling limits derive from classical control noise" }));
    defaults.insert(tn::COMPARE_PARADIGMS, json!({ "mainstream_paradigm": "decoherence-limited scaling", "alternative_paradigm": "control-noise ceiling" }));
    defaults.insert(tn::VALIDATE_NOVEL_THEORY, json!({ "theory_name": "control-noise ceiling", "theory_description": "scaling limits derive from classical control noise" }));
    defaults.insert(tn::EVALUATE_PARADIGM_SHIFT_POTENTIAL, json!({ "theory_description": "scaling limits derive from classical control noise" }));
    defaults.insert(tn::CULTIVATE_INNOVATION, json!({ "research_context": "plateaued logical error rates" }));
    defaults.insert(tn::GENERATE_LATEX_DOCUMENT, json!({ "title": "Preliminary Results", "template": "article" }));
    defaults.insert(tn::COMPILE_LATEX, json!({ "tex_path": "publications/preliminary_results.tex" }));
    defaults.insert(tn::LIST_LATEX_TEMPLATES, json!({}));
    defaults.insert(tn::FORMAT_RESEARCH_CONTENT, json!({ "content": "* first point\n* second point" }));
    defaults.insert(tn::GENERATE_BIBLIOGRAPHY, json!({ "style": "plain" }));
    defaults.insert(tn::INITIALIZE_PROJECT, json!({ "name": "demo-project", "domain": "physics" }));
    defaults.insert(tn::SWITCH_PROJECT_CONTEXT, json!({ "target_path": "." }));
    defaults.insert(tn::RESET_PROJECT_CONTEXT, json!({}));
    defaults.insert(tn::START_RESEARCH_SESSION, json!({ "session_type": "planning" }));
    defaults.insert(tn::GET_RESEARCH_PROGRESS, json!({}));
    defaults.insert(tn::GET_CONTEXTUAL_RECOMMENDATIONS, json!({}));
    defaults.insert(tn::DETECT_AND_CELEBRATE_MILESTONES, json!({}));
    defaults.insert(tn::GET_RESEARCH_ACT_GUIDANCE, json!({ "target_act": "conceptualization" }));
    defaults.insert(tn::ANALYZE_RESEARCH_JOURNEY, json!({ "time_period": "all_time" }));
    defaults.insert(tn::GET_TOOL_USAGE_VELOCITY, json!({}));
    defaults.insert(tn::GET_SESSION_SUMMARY, json!({}));
    defaults
}

/// Verify the catalog and defaults cover every registered tool name.
///
/// Returns the missing names (empty when the contract holds) and logs each
/// gap, matching how UIs report the mismatch on load.
#[must_use]
pub fn validate_against_registry(registry: &ToolRegistry) -> Vec<String> {
    let catalog: Vec<&str> = tool_catalog().iter().map(|e| e.name).collect();
    let defaults = default_arguments();

    let mut missing = Vec::new();
    for name in registry.available_names() {
        if !catalog.contains(&name.as_str()) {
            warn!(tool = %name, "tool missing from frontend catalog");
            missing.push(format!("catalog:{name}"));
        }
        if !defaults.contains_key(name.as_str()) {
            warn!(tool = %name, "tool missing from frontend defaults");
            missing.push(format!("defaults:{name}"));
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::CapabilityRegistry;

    #[test]
    fn contract_covers_every_tool_under_full_capabilities() {
        let registry = ToolRegistry::build(CapabilityRegistry::all_enabled()).unwrap();
        assert!(validate_against_registry(&registry).is_empty());
    }

    #[test]
    fn defaults_satisfy_each_tool_schema() {
        let registry = ToolRegistry::build(CapabilityRegistry::all_enabled()).unwrap();
        for (name, value) in default_arguments() {
            let Some(def) = registry.get(name) else {
                continue;
            };
            let args = value.as_object().cloned().unwrap_or_default();
            assert!(
                ToolRegistry::validate_arguments(def, &args).is_ok(),
                "defaults for {name} violate its schema"
            );
        }
    }
}
