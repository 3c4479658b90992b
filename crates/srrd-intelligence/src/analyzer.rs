// ABOUTME: Heuristic semantic analysis of user-supplied tool parameters
// ABOUTME: Keyword/regex classifiers for domain, intent, sophistication, and progression
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! # Interaction Analyzer
//!
//! Every classifier here is keyword or regex based by contract: cheap,
//! deterministic, and explainable. Scoring ranges and the
//! `interdisciplinary` / `intermediate` defaults are part of the contract;
//! the pattern lists are tunable.

use crate::framework::{ResearchAct, ResearchFramework};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Tool parameters whose values carry semantically meaningful free text.
pub const FREE_TEXT_FIELDS: [&str; 12] = [
    "research_area",
    "initial_goals",
    "research_goals",
    "research_context",
    "theory_description",
    "query",
    "content",
    "hypothesis",
    "methodology",
    "current_understanding",
    "user_response",
    "search_query",
];

const DOMAIN_LEXICONS: &[(&str, &[&str])] = &[
    (
        "physics",
        &[
            "quantum", "relativity", "particle", "photon", "entanglement", "thermodynamic",
            "cosmolog", "electromagnet", "momentum", "spacetime",
        ],
    ),
    (
        "computer_science",
        &[
            "algorithm", "software", "computing", "neural network", "machine learning",
            "data structure", "complexity", "programming", "compiler", "distributed system",
        ],
    ),
    (
        "biology",
        &[
            "cell", "gene", "protein", "organism", "evolution", "dna", "enzyme", "ecosystem",
            "species", "microbio",
        ],
    ),
    (
        "psychology",
        &[
            "cognitive", "behavior", "perception", "memory", "emotion", "mental",
            "consciousness", "attention", "psychometric",
        ],
    ),
    (
        "chemistry",
        &[
            "molecule", "reaction", "compound", "catalyst", "organic", "synthesis", "polymer",
            "electrochem", "solvent",
        ],
    ),
    (
        "mathematics",
        &[
            "theorem", "proof", "topology", "algebra", "equation", "manifold", "conjecture",
            "combinator", "number theory",
        ],
    ),
];

const EXPLORATION_KEYWORDS: &[&str] = &[
    "explore", "investigate", "understand", "discover", "curious", "what is", "how does", "why",
];
const VALIDATION_KEYWORDS: &[&str] = &[
    "validate", "verify", "test", "confirm", "prove", "evaluate", "assess", "check",
];
const APPLICATION_KEYWORDS: &[&str] = &[
    "apply", "implement", "build", "develop", "design", "create", "construct", "deploy",
];

const NOVEL_THEORY_PHRASES: &[&str] = &[
    "new theory",
    "novel theory",
    "alternative to",
    "challenge the",
    "challenges the",
    "paradigm shift",
    "unconventional",
    "contrary to mainstream",
    "rethink",
];

const EXPERT_MARKERS: &[&str] = &[
    "peer-reviewed",
    "methodological",
    "epistemolog",
    "rigorous",
    "formalism",
    "replication",
    "meta-analysis",
];
const INTERMEDIATE_MARKERS: &[&str] = &[
    "analysis", "framework", "hypothesis", "literature", "empirical", "variable",
];
const BEGINNER_MARKERS: &[&str] = &[
    "new to", "beginner", "basics", "simple", "help me understand", "what is", "getting started",
];

const UNCERTAINTY_MARKERS: &[&str] = &[
    "maybe", "perhaps", "might", "unsure", "not sure", "possibly", "unclear", "i think",
    "i guess",
];

// Fixed suffix/prefix pattern set; counts are normalized by word count.
const SOPHISTICATION_PATTERNS: &[&str] = &[
    r"\b\w+tion\b",
    r"\b\w+ical\b",
    r"\b\w+ology\b",
    r"\b\w+metric\b",
    r"\bmulti\w+",
    r"\bquasi\w+",
];

const SPECIFICITY_PATTERNS: &[&str] = &[
    r"\d+(\.\d+)?",
    r"\bet al\.?",
    r"\([^)]*\d{4}[^)]*\)",
    r"\b\w+-\w+\b",
    r"[%°µ±]",
];

fn sophistication_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile_patterns(SOPHISTICATION_PATTERNS))
}

fn specificity_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile_patterns(SPECIFICITY_PATTERNS))
}

fn compile_patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

/// Research intent classified from keyword buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchIntent {
    /// Open-ended investigation
    Exploration,
    /// Confirming or testing claims
    Validation,
    /// Building or applying something
    Application,
    /// Nothing matched decisively
    GeneralInquiry,
}

/// Self-evident knowledge level from marker phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeLevel {
    /// Beginner markers present and nothing stronger
    Beginner,
    /// The default when markers are absent or balanced
    Intermediate,
    /// Any expert marker present
    Expert,
}

/// Semantic feature vector extracted from one tool call's free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticAnalysis {
    /// Whitespace-delimited word count
    pub word_count: usize,
    /// Character count including whitespace
    pub char_count: usize,
    /// Primary domain, `interdisciplinary` when nothing matched
    pub primary_domain: String,
    /// Technical sophistication in [0, 1], two decimals
    pub sophistication_score: f64,
    /// Classified research intent
    pub research_intent: ResearchIntent,
    /// Summary of matched novel-theory phrases, when any matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub novel_theory_indicators: Option<String>,
    /// Classified knowledge level
    pub knowledge_level: KnowledgeLevel,
    /// Count of uncertainty marker phrases
    pub uncertainty_markers: usize,
    /// Specificity in [0, 1], two decimals
    pub specificity_score: f64,
}

/// One category transition between consecutive invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTransition {
    /// Earlier tool
    pub from_tool: String,
    /// Later tool
    pub to_tool: String,
    /// Workflow category of the earlier tool
    pub from_category: String,
    /// Workflow category of the later tool
    pub to_category: String,
}

/// Progression classification over the session's recent tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionAnalysis {
    /// Recent tool names, oldest first
    pub recent_tools: Vec<String>,
    /// Transitions between consecutive invocations
    pub transitions: Vec<CategoryTransition>,
    /// One-line summary of the movement
    pub summary: String,
}

/// Collect the known free-text fields present in a tool's arguments.
#[must_use]
pub fn free_text_fields(arguments: &Map<String, Value>) -> Vec<(String, String)> {
    FREE_TEXT_FIELDS
        .iter()
        .filter_map(|field| {
            arguments
                .get(*field)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(|s| ((*field).to_owned(), s.to_owned()))
        })
        .collect()
}

/// Analyze the combined free text of one tool call.
#[must_use]
pub fn analyze(tool_name: &str, fields: &[(String, String)]) -> SemanticAnalysis {
    let text = fields
        .iter()
        .map(|(_, v)| v.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let lower = text.to_lowercase();
    let word_count = text.split_whitespace().count();

    SemanticAnalysis {
        word_count,
        char_count: text.chars().count(),
        primary_domain: primary_domain(&lower),
        sophistication_score: pattern_density(&lower, sophistication_patterns(), word_count),
        research_intent: research_intent(&lower, tool_name),
        novel_theory_indicators: novel_theory_indicators(&lower),
        knowledge_level: knowledge_level(&lower),
        uncertainty_markers: count_markers(&lower, UNCERTAINTY_MARKERS),
        specificity_score: pattern_density(&text, specificity_patterns(), word_count),
    }
}

fn primary_domain(lower: &str) -> String {
    let mut best: Option<(&str, usize)> = None;
    for (domain, keywords) in DOMAIN_LEXICONS {
        let score = count_markers(lower, keywords);
        if score > 0 {
            // Strictly-greater keeps the first domain on ties.
            let better = best.map_or(true, |(_, s)| score > s);
            if better {
                best = Some((domain, score));
            }
        }
    }
    best.map_or_else(|| "interdisciplinary".to_owned(), |(d, _)| d.to_owned())
}

fn pattern_density(text: &str, patterns: &[Regex], word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let matches: usize = patterns.iter().map(|p| p.find_iter(text).count()).sum();
    let score = (matches as f64 / word_count as f64 * 10.0).min(1.0);
    (score * 100.0).round() / 100.0
}

fn research_intent(lower: &str, tool_name: &str) -> ResearchIntent {
    let mut exploration = count_markers(lower, EXPLORATION_KEYWORDS);
    let mut validation = count_markers(lower, VALIDATION_KEYWORDS);
    let mut application = count_markers(lower, APPLICATION_KEYWORDS);

    // Fixed bonus from the invoking tool's name.
    if tool_name.contains("search") || tool_name.contains("clarify") || tool_name.contains("discover")
    {
        exploration += 2;
    }
    if tool_name.contains("validate") || tool_name.contains("review") || tool_name.contains("check")
    {
        validation += 2;
    }
    if tool_name.contains("generate") || tool_name.contains("compile") || tool_name.contains("build")
    {
        application += 2;
    }

    let max = exploration.max(validation).max(application);
    if max == 0 {
        ResearchIntent::GeneralInquiry
    } else if exploration == max {
        ResearchIntent::Exploration
    } else if validation == max {
        ResearchIntent::Validation
    } else {
        ResearchIntent::Application
    }
}

fn novel_theory_indicators(lower: &str) -> Option<String> {
    let matched: Vec<&str> = NOVEL_THEORY_PHRASES
        .iter()
        .copied()
        .filter(|phrase| lower.contains(phrase))
        .collect();
    if matched.is_empty() {
        None
    } else {
        Some(format!("Novel theory indicators: {}", matched.join(", ")))
    }
}

fn knowledge_level(lower: &str) -> KnowledgeLevel {
    if EXPERT_MARKERS.iter().any(|m| lower.contains(m)) {
        return KnowledgeLevel::Expert;
    }
    let intermediate = count_markers(lower, INTERMEDIATE_MARKERS);
    let beginner = count_markers(lower, BEGINNER_MARKERS);
    if intermediate > beginner {
        KnowledgeLevel::Intermediate
    } else if beginner > 0 {
        KnowledgeLevel::Beginner
    } else {
        KnowledgeLevel::Intermediate
    }
}

fn count_markers(lower: &str, markers: &[&str]) -> usize {
    markers.iter().filter(|m| lower.contains(**m)).count()
}

/// Four-way workflow partition used by progression analysis.
fn workflow_category(framework: &ResearchFramework, tool: &str) -> &'static str {
    match framework.act_for_tool(tool) {
        Some(ResearchAct::Conceptualization | ResearchAct::DesignPlanning) => "planning",
        Some(ResearchAct::KnowledgeAcquisition | ResearchAct::AnalysisSynthesis) => "discovery",
        Some(ResearchAct::ValidationRefinement) => "validation",
        Some(ResearchAct::Communication) => "generation",
        None => "generation",
    }
}

/// Classify category transitions over the session's last tools (oldest first).
#[must_use]
pub fn analyze_progression(
    framework: &ResearchFramework,
    recent_tools: &[String],
) -> ProgressionAnalysis {
    let transitions: Vec<CategoryTransition> = recent_tools
        .windows(2)
        .map(|pair| CategoryTransition {
            from_tool: pair[0].clone(),
            to_tool: pair[1].clone(),
            from_category: workflow_category(framework, &pair[0]).to_owned(),
            to_category: workflow_category(framework, &pair[1]).to_owned(),
        })
        .collect();

    let forward = transitions
        .iter()
        .filter(|t| t.from_category != t.to_category)
        .count();
    let summary = if transitions.is_empty() {
        "No prior invocations in this session.".to_owned()
    } else {
        format!(
            "{} of {} recent transitions crossed workflow categories.",
            forward,
            transitions.len()
        )
    };

    ProgressionAnalysis {
        recent_tools: recent_tools.to_vec(),
        transitions,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::tool_names as tn;

    fn fields(text: &str) -> Vec<(String, String)> {
        vec![("research_area".to_owned(), text.to_owned())]
    }

    #[test]
    fn physics_text_classifies_as_physics() {
        let analysis = analyze(
            tn::CLARIFY_RESEARCH_GOALS,
            &fields("quantum entanglement and particle momentum in spacetime"),
        );
        assert_eq!(analysis.primary_domain, "physics");
        assert_eq!(analysis.word_count, 7);
    }

    #[test]
    fn unmatched_text_defaults_to_interdisciplinary() {
        let analysis = analyze(tn::CLARIFY_RESEARCH_GOALS, &fields("gardening on weekends"));
        assert_eq!(analysis.primary_domain, "interdisciplinary");
    }

    #[test]
    fn sophistication_is_clipped_and_rounded() {
        let analysis = analyze(
            tn::CLARIFY_RESEARCH_GOALS,
            &fields("methodological epistemological topological"),
        );
        assert!(analysis.sophistication_score >= 0.0);
        assert!(analysis.sophistication_score <= 1.0);
        let scaled = analysis.sophistication_score * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }

    #[test]
    fn empty_text_scores_zero_everywhere() {
        let analysis = analyze(tn::CLARIFY_RESEARCH_GOALS, &[]);
        assert_eq!(analysis.word_count, 0);
        assert!((analysis.sophistication_score - 0.0).abs() < f64::EPSILON);
        assert!((analysis.specificity_score - 0.0).abs() < f64::EPSILON);
        assert_eq!(analysis.knowledge_level, KnowledgeLevel::Intermediate);
    }

    #[test]
    fn tool_name_bonus_steers_intent() {
        let analysis = analyze(tn::SEMANTIC_SEARCH, &fields("superconductor materials"));
        assert_eq!(analysis.research_intent, ResearchIntent::Exploration);

        let analysis = analyze(tn::VALIDATE_NOVEL_THEORY, &fields("superconductor materials"));
        assert_eq!(analysis.research_intent, ResearchIntent::Validation);
    }

    #[test]
    fn novel_theory_phrases_are_reported() {
        let analysis = analyze(
            tn::INITIATE_PARADIGM_CHALLENGE,
            &fields("a novel theory that challenges the standard model"),
        );
        let indicators = analysis.novel_theory_indicators.unwrap();
        assert!(indicators.contains("novel theory"));

        let analysis = analyze(tn::CLARIFY_RESEARCH_GOALS, &fields("routine measurement"));
        assert!(analysis.novel_theory_indicators.is_none());
    }

    #[test]
    fn expert_markers_win_over_beginner_markers() {
        let analysis = analyze(
            tn::CLARIFY_RESEARCH_GOALS,
            &fields("I am new to peer-reviewed meta-analysis work"),
        );
        assert_eq!(analysis.knowledge_level, KnowledgeLevel::Expert);
    }

    #[test]
    fn free_text_fields_filters_unknown_and_empty() {
        let mut args = Map::new();
        args.insert("research_area".to_owned(), Value::String("quantum".to_owned()));
        args.insert("unrelated".to_owned(), Value::String("ignored".to_owned()));
        args.insert("query".to_owned(), Value::String("  ".to_owned()));
        args.insert("limit".to_owned(), Value::from(3));
        let fields = free_text_fields(&args);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "research_area");
    }

    #[test]
    fn progression_tracks_category_transitions() {
        let fw = ResearchFramework::new();
        let recent = vec![
            tn::CLARIFY_RESEARCH_GOALS.to_owned(),
            tn::SEMANTIC_SEARCH.to_owned(),
            tn::SIMULATE_PEER_REVIEW.to_owned(),
        ];
        let progression = analyze_progression(&fw, &recent);
        assert_eq!(progression.transitions.len(), 2);
        assert_eq!(progression.transitions[0].from_category, "planning");
        assert_eq!(progression.transitions[0].to_category, "discovery");
        assert_eq!(progression.transitions[1].to_category, "validation");
    }
}
