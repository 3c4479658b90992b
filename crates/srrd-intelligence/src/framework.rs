// ABOUTME: Static research framework taxonomy mapping tools to categories to research acts
// ABOUTME: Provides act parsing with historical aliases and registry coverage verification
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Research Framework
//!
//! The fixed taxonomy behind all progress scoring: six research acts, each
//! owning categories, each category owning tool names. The mapping
//! tool → category → act is total over the registered tool set; the server
//! verifies this at startup via [`ResearchFramework::verify_registry`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Canonical tool-name constants, shared by the framework, the server's tool
/// registry, and the frontend catalog so the three can never disagree on
/// spelling.
pub mod tool_names {
    /// Socratic clarification of research goals
    pub const CLARIFY_RESEARCH_GOALS: &str = "clarify_research_goals";
    /// Surface and examine foundational assumptions
    pub const ASSESS_FOUNDATIONAL_ASSUMPTIONS: &str = "assess_foundational_assumptions";
    /// Generate critical questions about the research framing
    pub const GENERATE_CRITICAL_QUESTIONS: &str = "generate_critical_questions";

    /// Recommend a methodology for stated goals
    pub const SUGGEST_METHODOLOGY: &str = "suggest_methodology";
    /// Explain a named methodology in context
    pub const EXPLAIN_METHODOLOGY: &str = "explain_methodology";
    /// Compare candidate methodological approaches
    pub const COMPARE_APPROACHES: &str = "compare_approaches";
    /// Check an experimental design for validity threats
    pub const VALIDATE_DESIGN: &str = "validate_design";
    /// Review ethical considerations of a design
    pub const ENSURE_ETHICS: &str = "ensure_ethics";

    /// Search the project knowledge base semantically
    pub const SEMANTIC_SEARCH: &str = "semantic_search";
    /// Extract key concepts from supplied text
    pub const EXTRACT_KEY_CONCEPTS: &str = "extract_key_concepts";
    /// Store a bibliography reference in the project store
    pub const STORE_BIBLIOGRAPHY_REFERENCE: &str = "store_bibliography_reference";
    /// Retrieve stored bibliography references
    pub const RETRIEVE_BIBLIOGRAPHY_REFERENCES: &str = "retrieve_bibliography_references";
    /// Split a document into labeled sections
    pub const EXTRACT_DOCUMENT_SECTIONS: &str = "extract_document_sections";

    /// Discover recurring patterns across the knowledge base
    pub const DISCOVER_PATTERNS: &str = "discover_patterns";
    /// Find documents similar to a given one
    pub const FIND_SIMILAR_DOCUMENTS: &str = "find_similar_documents";
    /// Build a concept co-occurrence graph
    pub const BUILD_KNOWLEDGE_GRAPH: &str = "build_knowledge_graph";
    /// Summarize accumulated research material
    pub const GENERATE_RESEARCH_SUMMARY: &str = "generate_research_summary";

    /// Simulate a peer review of supplied content
    pub const SIMULATE_PEER_REVIEW: &str = "simulate_peer_review";
    /// Multi-turn Socratic dialogue on the current understanding
    pub const ENHANCED_SOCRATIC_DIALOGUE: &str = "enhanced_socratic_dialogue";
    /// Run publication-readiness quality gates
    pub const CHECK_QUALITY_GATES: &str = "check_quality_gates";
    /// Open a structured challenge to a mainstream paradigm
    pub const INITIATE_PARADIGM_CHALLENGE: &str = "initiate_paradigm_challenge";
    /// Develop an alternative theoretical framework
    pub const DEVELOP_ALTERNATIVE_FRAMEWORK: &str = "develop_alternative_framework";
    /// Compare mainstream and alternative paradigms with equal treatment
    pub const COMPARE_PARADIGMS: &str = "compare_paradigms";
    /// Validate a novel theory against standard criteria
    pub const VALIDATE_NOVEL_THEORY: &str = "validate_novel_theory";
    /// Assess the paradigm-shift potential of a theory
    pub const EVALUATE_PARADIGM_SHIFT_POTENTIAL: &str = "evaluate_paradigm_shift_potential";
    /// Foster innovative directions from current work
    pub const CULTIVATE_INNOVATION: &str = "cultivate_innovation";

    /// Generate a LaTeX document skeleton
    pub const GENERATE_LATEX_DOCUMENT: &str = "generate_latex_document";
    /// Compile a LaTeX source file to PDF
    pub const COMPILE_LATEX: &str = "compile_latex";
    /// List installed LaTeX templates
    pub const LIST_LATEX_TEMPLATES: &str = "list_latex_templates";
    /// Normalize research content formatting
    pub const FORMAT_RESEARCH_CONTENT: &str = "format_research_content";
    /// Render stored references as a bibliography
    pub const GENERATE_BIBLIOGRAPHY: &str = "generate_bibliography";

    /// Initialize a directory as a research project
    pub const INITIALIZE_PROJECT: &str = "initialize_project";
    /// Switch the connection's project context override
    pub const SWITCH_PROJECT_CONTEXT: &str = "switch_project_context";
    /// Clear the connection's project context override
    pub const RESET_PROJECT_CONTEXT: &str = "reset_project_context";
    /// Open a research session for interaction grouping
    pub const START_RESEARCH_SESSION: &str = "start_research_session";

    /// Per-act research progress report
    pub const GET_RESEARCH_PROGRESS: &str = "get_research_progress";
    /// Pattern-classified next-tool recommendations
    pub const GET_CONTEXTUAL_RECOMMENDATIONS: &str = "get_contextual_recommendations";
    /// Milestone detection over usage history
    pub const DETECT_AND_CELEBRATE_MILESTONES: &str = "detect_and_celebrate_milestones";
    /// Experience-adapted guidance for a research act
    pub const GET_RESEARCH_ACT_GUIDANCE: &str = "get_research_act_guidance";
    /// Journey analytics over a time period
    pub const ANALYZE_RESEARCH_JOURNEY: &str = "analyze_research_journey";
    /// Invocations-per-day velocity report
    pub const GET_TOOL_USAGE_VELOCITY: &str = "get_tool_usage_velocity";
    /// Summary of the active research session
    pub const GET_SESSION_SUMMARY: &str = "get_session_summary";
}

use self::tool_names as tn;

/// The six research acts, in canonical workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchAct {
    /// Framing goals, assumptions, and critical questions
    Conceptualization,
    /// Methodology selection and design validation
    DesignPlanning,
    /// Literature search and source management
    KnowledgeAcquisition,
    /// Pattern recognition and knowledge building
    AnalysisSynthesis,
    /// Review, quality gates, and paradigm validation
    ValidationRefinement,
    /// Document generation and project management
    Communication,
}

impl ResearchAct {
    /// All acts in canonical chain order
    pub const ALL: [Self; 6] = [
        Self::Conceptualization,
        Self::DesignPlanning,
        Self::KnowledgeAcquisition,
        Self::AnalysisSynthesis,
        Self::ValidationRefinement,
        Self::Communication,
    ];

    /// Canonical snake_case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conceptualization => "conceptualization",
            Self::DesignPlanning => "design_planning",
            Self::KnowledgeAcquisition => "knowledge_acquisition",
            Self::AnalysisSynthesis => "analysis_synthesis",
            Self::ValidationRefinement => "validation_refinement",
            Self::Communication => "communication",
        }
    }

    /// Human-readable title for reports
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Conceptualization => "Conceptualization",
            Self::DesignPlanning => "Design & Planning",
            Self::KnowledgeAcquisition => "Knowledge Acquisition",
            Self::AnalysisSynthesis => "Analysis & Synthesis",
            Self::ValidationRefinement => "Validation & Refinement",
            Self::Communication => "Communication",
        }
    }

    /// Milestone icon associated with completing this act
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Conceptualization => "💡",
            Self::DesignPlanning => "📐",
            Self::KnowledgeAcquisition => "📚",
            Self::AnalysisSynthesis => "🔬",
            Self::ValidationRefinement => "✅",
            Self::Communication => "📄",
        }
    }

    /// Next act in the canonical chain, if any
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Conceptualization => Some(Self::DesignPlanning),
            Self::DesignPlanning => Some(Self::KnowledgeAcquisition),
            Self::KnowledgeAcquisition => Some(Self::AnalysisSynthesis),
            Self::AnalysisSynthesis => Some(Self::ValidationRefinement),
            Self::ValidationRefinement => Some(Self::Communication),
            Self::Communication => None,
        }
    }

    /// Parse a canonical or historical act name.
    ///
    /// Historical aliases (`implementation`, `analysis`, `synthesis`,
    /// `publication`) are normalized on input only; stored data keeps
    /// whatever name it was recorded under.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "conceptualization" => Some(Self::Conceptualization),
            "design_planning" | "planning" => Some(Self::DesignPlanning),
            "knowledge_acquisition" | "implementation" => Some(Self::KnowledgeAcquisition),
            "analysis_synthesis" | "analysis" => Some(Self::AnalysisSynthesis),
            "validation_refinement" | "synthesis" => Some(Self::ValidationRefinement),
            "communication" | "publication" => Some(Self::Communication),
            _ => None,
        }
    }
}

/// A named category owning an ordered tool progression.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    /// Category identifier
    pub name: &'static str,
    /// Tools in act-specific progression order
    pub tools: &'static [&'static str],
}

const CONCEPTUALIZATION: &[Category] = &[
    Category {
        name: "goal_setting",
        tools: &[tn::CLARIFY_RESEARCH_GOALS],
    },
    Category {
        name: "critical_thinking",
        tools: &[
            tn::ASSESS_FOUNDATIONAL_ASSUMPTIONS,
            tn::GENERATE_CRITICAL_QUESTIONS,
        ],
    },
];

const DESIGN_PLANNING: &[Category] = &[
    Category {
        name: "methodology",
        tools: &[
            tn::SUGGEST_METHODOLOGY,
            tn::EXPLAIN_METHODOLOGY,
            tn::COMPARE_APPROACHES,
        ],
    },
    Category {
        name: "experimental_design",
        tools: &[tn::VALIDATE_DESIGN],
    },
    Category {
        name: "ethics_validation",
        tools: &[tn::ENSURE_ETHICS],
    },
];

const KNOWLEDGE_ACQUISITION: &[Category] = &[
    Category {
        name: "literature_search",
        tools: &[tn::SEMANTIC_SEARCH, tn::EXTRACT_KEY_CONCEPTS],
    },
    Category {
        name: "source_management",
        tools: &[
            tn::STORE_BIBLIOGRAPHY_REFERENCE,
            tn::RETRIEVE_BIBLIOGRAPHY_REFERENCES,
        ],
    },
    Category {
        name: "information_extraction",
        tools: &[tn::EXTRACT_DOCUMENT_SECTIONS],
    },
];

const ANALYSIS_SYNTHESIS: &[Category] = &[
    Category {
        name: "pattern_recognition",
        tools: &[tn::DISCOVER_PATTERNS, tn::FIND_SIMILAR_DOCUMENTS],
    },
    Category {
        name: "knowledge_building",
        tools: &[tn::BUILD_KNOWLEDGE_GRAPH, tn::GENERATE_RESEARCH_SUMMARY],
    },
];

const VALIDATION_REFINEMENT: &[Category] = &[
    Category {
        name: "peer_review",
        tools: &[tn::SIMULATE_PEER_REVIEW, tn::ENHANCED_SOCRATIC_DIALOGUE],
    },
    Category {
        name: "quality_assurance",
        tools: &[tn::CHECK_QUALITY_GATES],
    },
    Category {
        name: "paradigm_validation",
        tools: &[
            tn::INITIATE_PARADIGM_CHALLENGE,
            tn::DEVELOP_ALTERNATIVE_FRAMEWORK,
            tn::COMPARE_PARADIGMS,
            tn::VALIDATE_NOVEL_THEORY,
            tn::EVALUATE_PARADIGM_SHIFT_POTENTIAL,
            tn::CULTIVATE_INNOVATION,
        ],
    },
];

const COMMUNICATION: &[Category] = &[
    Category {
        name: "document_generation",
        tools: &[
            tn::GENERATE_LATEX_DOCUMENT,
            tn::COMPILE_LATEX,
            tn::LIST_LATEX_TEMPLATES,
        ],
    },
    Category {
        name: "formatting",
        tools: &[tn::FORMAT_RESEARCH_CONTENT, tn::GENERATE_BIBLIOGRAPHY],
    },
    Category {
        name: "project_management",
        tools: &[
            tn::INITIALIZE_PROJECT,
            tn::SWITCH_PROJECT_CONTEXT,
            tn::RESET_PROJECT_CONTEXT,
            tn::START_RESEARCH_SESSION,
        ],
    },
    Category {
        name: "research_continuity",
        tools: &[
            tn::GET_RESEARCH_PROGRESS,
            tn::GET_CONTEXTUAL_RECOMMENDATIONS,
            tn::DETECT_AND_CELEBRATE_MILESTONES,
            tn::GET_RESEARCH_ACT_GUIDANCE,
            tn::ANALYZE_RESEARCH_JOURNEY,
            tn::GET_TOOL_USAGE_VELOCITY,
            tn::GET_SESSION_SUMMARY,
        ],
    },
];

/// The static act → category → tool taxonomy plus reverse lookup indices.
#[derive(Debug, Clone)]
pub struct ResearchFramework {
    act_for_tool: HashMap<&'static str, ResearchAct>,
    category_for_tool: HashMap<&'static str, &'static str>,
}

impl Default for ResearchFramework {
    fn default() -> Self {
        Self::new()
    }
}

impl ResearchFramework {
    /// Build the framework with its reverse indices.
    #[must_use]
    pub fn new() -> Self {
        let mut act_for_tool = HashMap::new();
        let mut category_for_tool = HashMap::new();
        for act in ResearchAct::ALL {
            for category in Self::categories(act) {
                for tool in category.tools {
                    act_for_tool.insert(*tool, act);
                    category_for_tool.insert(*tool, category.name);
                }
            }
        }
        Self {
            act_for_tool,
            category_for_tool,
        }
    }

    /// Categories owned by an act, in progression order
    #[must_use]
    pub const fn categories(act: ResearchAct) -> &'static [Category] {
        match act {
            ResearchAct::Conceptualization => CONCEPTUALIZATION,
            ResearchAct::DesignPlanning => DESIGN_PLANNING,
            ResearchAct::KnowledgeAcquisition => KNOWLEDGE_ACQUISITION,
            ResearchAct::AnalysisSynthesis => ANALYSIS_SYNTHESIS,
            ResearchAct::ValidationRefinement => VALIDATION_REFINEMENT,
            ResearchAct::Communication => COMMUNICATION,
        }
    }

    /// Act owning a tool name, if the tool is in the taxonomy
    #[must_use]
    pub fn act_for_tool(&self, tool: &str) -> Option<ResearchAct> {
        self.act_for_tool.get(tool).copied()
    }

    /// Category owning a tool name
    #[must_use]
    pub fn category_for_tool(&self, tool: &str) -> Option<&'static str> {
        self.category_for_tool.get(tool).copied()
    }

    /// Tools assigned to an act, flattened across categories in
    /// progression order
    #[must_use]
    pub fn tools_for_act(&self, act: ResearchAct) -> Vec<&'static str> {
        Self::categories(act)
            .iter()
            .flat_map(|c| c.tools.iter().copied())
            .collect()
    }

    /// Every tool name in the taxonomy
    #[must_use]
    pub fn all_tools(&self) -> Vec<&'static str> {
        ResearchAct::ALL
            .into_iter()
            .flat_map(|act| self.tools_for_act(act))
            .collect()
    }

    /// Verify that a registered tool set and the taxonomy agree.
    ///
    /// Mismatches are warnings, never fatal: a registered tool missing from
    /// the taxonomy falls out of progress scoring, and a taxonomy entry with
    /// no registered tool is dormant (usually a capability that is not
    /// installed, which is expected and not reported).
    pub fn verify_registry(&self, registered: &[String]) {
        for name in registered {
            if !self.act_for_tool.contains_key(name.as_str()) {
                warn!(
                    tool = %name,
                    "registered tool is not assigned to any research act; it will not be scored"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn act_membership_is_total_and_unique() {
        let fw = ResearchFramework::new();
        let mut seen = HashMap::new();
        for act in ResearchAct::ALL {
            for tool in fw.tools_for_act(act) {
                assert!(
                    seen.insert(tool, act).is_none(),
                    "tool {tool} appears in more than one act"
                );
            }
        }
        for tool in fw.all_tools() {
            assert!(fw.act_for_tool(tool).is_some());
            assert!(fw.category_for_tool(tool).is_some());
        }
    }

    #[test]
    fn conceptualization_owns_exactly_its_three_tools() {
        let fw = ResearchFramework::new();
        let tools = fw.tools_for_act(ResearchAct::Conceptualization);
        assert_eq!(
            tools,
            vec![
                tool_names::CLARIFY_RESEARCH_GOALS,
                tool_names::ASSESS_FOUNDATIONAL_ASSUMPTIONS,
                tool_names::GENERATE_CRITICAL_QUESTIONS,
            ]
        );
    }

    #[test]
    fn historical_aliases_parse_to_canonical_acts() {
        assert_eq!(
            ResearchAct::parse("implementation"),
            Some(ResearchAct::KnowledgeAcquisition)
        );
        assert_eq!(
            ResearchAct::parse("analysis"),
            Some(ResearchAct::AnalysisSynthesis)
        );
        assert_eq!(
            ResearchAct::parse("synthesis"),
            Some(ResearchAct::ValidationRefinement)
        );
        assert_eq!(
            ResearchAct::parse("publication"),
            Some(ResearchAct::Communication)
        );
        assert_eq!(ResearchAct::parse("alchemy"), None);
    }

    #[test]
    fn act_chain_terminates_at_communication() {
        let mut act = ResearchAct::Conceptualization;
        let mut hops = 0;
        while let Some(next) = act.next() {
            act = next;
            hops += 1;
        }
        assert_eq!(act, ResearchAct::Communication);
        assert_eq!(hops, 5);
    }
}
