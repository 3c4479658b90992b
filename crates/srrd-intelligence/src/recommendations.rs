// ABOUTME: Contextual next-tool recommendations classified from recent invocation patterns
// ABOUTME: Matches canonical two-tool progressions and name-diversity thresholds
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use crate::framework::{tool_names as tn, ResearchAct, ResearchFramework};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How many trailing invocations the classifier inspects by default.
pub const DEFAULT_LOOKBACK: usize = 5;

/// Canonical two-tool progressions that read as deliberate forward motion.
const CANONICAL_PROGRESSIONS: &[(&str, &str)] = &[
    (tn::CLARIFY_RESEARCH_GOALS, tn::SUGGEST_METHODOLOGY),
    (tn::ASSESS_FOUNDATIONAL_ASSUMPTIONS, tn::GENERATE_CRITICAL_QUESTIONS),
    (tn::SUGGEST_METHODOLOGY, tn::VALIDATE_DESIGN),
    (tn::SUGGEST_METHODOLOGY, tn::SEMANTIC_SEARCH),
    (tn::SEMANTIC_SEARCH, tn::DISCOVER_PATTERNS),
    (tn::DISCOVER_PATTERNS, tn::GENERATE_RESEARCH_SUMMARY),
    (tn::GENERATE_RESEARCH_SUMMARY, tn::SIMULATE_PEER_REVIEW),
    (tn::SIMULATE_PEER_REVIEW, tn::GENERATE_LATEX_DOCUMENT),
    (tn::GENERATE_LATEX_DOCUMENT, tn::COMPILE_LATEX),
];

/// Classified shape of the recent invocation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// No usage recorded yet
    NoActivity,
    /// Fewer than two invocations; too early to classify
    Initial,
    /// A canonical progression appears in the recent sequence
    LogicalProgression,
    /// Low name diversity; the researcher is drilling into one area
    DeepeningFocus,
    /// High name diversity; the researcher is surveying
    Exploratory,
}

/// An alternative path offered next to the primary recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativePath {
    /// Short path label
    pub name: String,
    /// What following it looks like
    pub description: String,
    /// Representative tools on the path
    pub tools: Vec<String>,
}

/// A recommended tool with rationale, ordered by priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Tool to run next
    pub tool: String,
    /// Act the tool belongs to
    pub act: ResearchAct,
    /// Why this tool, given the observed pattern
    pub rationale: String,
}

/// Full contextual-recommendation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextualRecommendations {
    /// Classified pattern of the recent sequence
    pub pattern_type: PatternType,
    /// Name diversity of the inspected window, in [0, 1]
    pub diversity: f64,
    /// Prioritized next tools
    pub prioritized_recommendations: Vec<Recommendation>,
    /// Two to three alternative paths
    pub alternative_paths: Vec<AlternativePath>,
}

/// Classify the recent sequence and produce prioritized recommendations.
///
/// `recent` is ordered oldest → newest and is expected to already be limited
/// to the lookback window; `all_used` is the full distinct-tool history used
/// to avoid recommending tools the researcher has already run.
#[must_use]
pub fn contextual_recommendations(
    framework: &ResearchFramework,
    recent: &[String],
    all_used: &HashSet<String>,
) -> ContextualRecommendations {
    let diversity = name_diversity(recent);
    let pattern_type = classify(recent, diversity);

    let current_act = recent
        .last()
        .and_then(|t| framework.act_for_tool(t))
        .unwrap_or(ResearchAct::Conceptualization);

    let prioritized_recommendations =
        prioritize(framework, pattern_type, current_act, all_used);
    let alternative_paths = alternatives(framework, current_act, all_used);

    ContextualRecommendations {
        pattern_type,
        diversity,
        prioritized_recommendations,
        alternative_paths,
    }
}

fn name_diversity(recent: &[String]) -> f64 {
    if recent.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<&str> = recent.iter().map(String::as_str).collect();
    distinct.len() as f64 / recent.len() as f64
}

fn classify(recent: &[String], diversity: f64) -> PatternType {
    if recent.is_empty() {
        return PatternType::NoActivity;
    }
    if recent.len() < 2 {
        return PatternType::Initial;
    }
    let canonical = recent.windows(2).any(|pair| {
        CANONICAL_PROGRESSIONS
            .iter()
            .any(|(from, to)| pair[0] == *from && pair[1] == *to)
    });
    if canonical {
        PatternType::LogicalProgression
    } else if diversity > 0.8 {
        PatternType::Exploratory
    } else if diversity < 0.5 {
        PatternType::DeepeningFocus
    } else {
        PatternType::Exploratory
    }
}

fn prioritize(
    framework: &ResearchFramework,
    pattern: PatternType,
    current_act: ResearchAct,
    all_used: &HashSet<String>,
) -> Vec<Recommendation> {
    // Unused tools of the current act first, then of the next act in the
    // canonical chain; deepening researchers get the current act only.
    let mut acts = vec![current_act];
    if pattern != PatternType::DeepeningFocus {
        if let Some(next) = current_act.next() {
            acts.push(next);
        }
    }

    let mut out = Vec::new();
    for act in acts {
        for tool in framework.tools_for_act(act) {
            if all_used.contains(tool) || out.len() >= 3 {
                continue;
            }
            let rationale = match pattern {
                PatternType::NoActivity | PatternType::Initial => format!(
                    "A natural starting point in {}",
                    act.display_name()
                ),
                PatternType::LogicalProgression => format!(
                    "Continues the current progression through {}",
                    act.display_name()
                ),
                PatternType::DeepeningFocus => format!(
                    "Deepens the {} work already underway",
                    act.display_name()
                ),
                PatternType::Exploratory => format!(
                    "Anchors the exploration with an unused {} step",
                    act.display_name()
                ),
            };
            out.push(Recommendation {
                tool: tool.to_owned(),
                act,
                rationale,
            });
        }
    }
    out
}

fn alternatives(
    framework: &ResearchFramework,
    current_act: ResearchAct,
    all_used: &HashSet<String>,
) -> Vec<AlternativePath> {
    let mut paths = Vec::new();

    let unused_here: Vec<String> = framework
        .tools_for_act(current_act)
        .into_iter()
        .filter(|t| !all_used.contains(*t))
        .map(str::to_owned)
        .take(3)
        .collect();
    if !unused_here.is_empty() {
        paths.push(AlternativePath {
            name: "deepen_current_act".to_owned(),
            description: format!(
                "Finish the remaining {} tools before moving on",
                current_act.display_name()
            ),
            tools: unused_here,
        });
    }

    if let Some(next) = current_act.next() {
        paths.push(AlternativePath {
            name: "advance_to_next_act".to_owned(),
            description: format!("Move ahead into {}", next.display_name()),
            tools: framework
                .tools_for_act(next)
                .into_iter()
                .map(str::to_owned)
                .take(3)
                .collect(),
        });
    }

    paths.push(AlternativePath {
        name: "revisit_foundations".to_owned(),
        description: "Return to conceptualization and re-examine the framing".to_owned(),
        tools: framework
            .tools_for_act(ResearchAct::Conceptualization)
            .into_iter()
            .map(str::to_owned)
            .collect(),
    });

    paths.truncate(3);
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn used(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn empty_history_reports_no_activity() {
        let fw = ResearchFramework::new();
        let recs = contextual_recommendations(&fw, &[], &HashSet::new());
        assert_eq!(recs.pattern_type, PatternType::NoActivity);
        assert!(!recs.prioritized_recommendations.is_empty());
    }

    #[test]
    fn clarify_then_suggest_is_logical_progression() {
        let fw = ResearchFramework::new();
        let recent = vec![
            tn::CLARIFY_RESEARCH_GOALS.to_owned(),
            tn::SUGGEST_METHODOLOGY.to_owned(),
        ];
        let all = used(&[tn::CLARIFY_RESEARCH_GOALS, tn::SUGGEST_METHODOLOGY]);
        let recs = contextual_recommendations(&fw, &recent, &all);
        assert_eq!(recs.pattern_type, PatternType::LogicalProgression);

        // At least one unused design-planning tool must be recommended.
        assert!(recs
            .prioritized_recommendations
            .iter()
            .any(|r| r.act == ResearchAct::DesignPlanning && !all.contains(&r.tool)));
        assert!(recs
            .prioritized_recommendations
            .iter()
            .all(|r| !r.rationale.is_empty()));
        assert!((2..=3).contains(&recs.alternative_paths.len()));
    }

    #[test]
    fn repeating_one_tool_is_deepening_focus() {
        let fw = ResearchFramework::new();
        let recent = vec![
            tn::SEMANTIC_SEARCH.to_owned(),
            tn::EXTRACT_KEY_CONCEPTS.to_owned(),
            tn::SEMANTIC_SEARCH.to_owned(),
            tn::SEMANTIC_SEARCH.to_owned(),
            tn::SEMANTIC_SEARCH.to_owned(),
        ];
        let recs = contextual_recommendations(&fw, &recent, &used(&[tn::SEMANTIC_SEARCH]));
        assert_eq!(recs.pattern_type, PatternType::DeepeningFocus);
    }

    #[test]
    fn five_distinct_non_canonical_tools_are_exploratory() {
        let fw = ResearchFramework::new();
        let recent = vec![
            tn::ENSURE_ETHICS.to_owned(),
            tn::EXTRACT_KEY_CONCEPTS.to_owned(),
            tn::FORMAT_RESEARCH_CONTENT.to_owned(),
            tn::CHECK_QUALITY_GATES.to_owned(),
            tn::BUILD_KNOWLEDGE_GRAPH.to_owned(),
        ];
        let recs = contextual_recommendations(&fw, &recent, &HashSet::new());
        assert_eq!(recs.pattern_type, PatternType::Exploratory);
    }

    #[test]
    fn single_invocation_is_initial() {
        let fw = ResearchFramework::new();
        let recent = vec![tn::CLARIFY_RESEARCH_GOALS.to_owned()];
        let recs = contextual_recommendations(&fw, &recent, &used(&[tn::CLARIFY_RESEARCH_GOALS]));
        assert_eq!(recs.pattern_type, PatternType::Initial);
    }
}
