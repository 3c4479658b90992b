// ABOUTME: Experience-adapted guidance for a target research act
// ABOUTME: Emits purpose, key activities, challenges, and up to three smart next tools
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use crate::framework::{ResearchAct, ResearchFramework};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Self-reported researcher experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// New to the research act
    Beginner,
    /// Comfortable but not fluent
    Intermediate,
    /// Fluent; wants depth over orientation
    Expert,
}

impl ExperienceLevel {
    /// Parse with an intermediate default for unknown input.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "novice" => Self::Beginner,
            "expert" | "advanced" => Self::Expert,
            _ => Self::Intermediate,
        }
    }
}

/// A suggested tool with a one-line rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSuggestion {
    /// Tool name
    pub tool: String,
    /// Why this tool is next
    pub rationale: String,
}

/// Structured guidance for one research act.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActGuidance {
    /// Target act
    pub act: ResearchAct,
    /// One-sentence purpose of the act
    pub purpose: String,
    /// Ordered tool names constituting the act's key activities
    pub key_activities: Vec<String>,
    /// What done looks like
    pub success_criteria: Vec<String>,
    /// Challenges researchers commonly hit in this act
    pub common_challenges: Vec<String>,
    /// Level-specific adaptation advice
    pub adaptations: Vec<String>,
    /// Up to three unused tools of the act, in progression order
    pub next_tools: Vec<ToolSuggestion>,
    /// Set when every tool of the act has been used
    pub advance_to: Option<ResearchAct>,
}

struct ActProfile {
    purpose: &'static str,
    success_criteria: &'static [&'static str],
    common_challenges: &'static [&'static str],
}

const fn profile(act: ResearchAct) -> ActProfile {
    match act {
        ResearchAct::Conceptualization => ActProfile {
            purpose: "Frame the research question, surface assumptions, and sharpen goals before committing to a direction.",
            success_criteria: &[
                "Research goals stated in one falsifiable sentence",
                "Foundational assumptions listed and examined",
                "Open critical questions recorded",
            ],
            common_challenges: &[
                "Goals stated as topics rather than questions",
                "Unexamined assumptions imported from prior work",
            ],
        },
        ResearchAct::DesignPlanning => ActProfile {
            purpose: "Choose and justify a methodology, then validate the study design against threats and ethics.",
            success_criteria: &[
                "Methodology chosen with explicit trade-offs",
                "Design reviewed for validity threats",
                "Ethical considerations documented",
            ],
            common_challenges: &[
                "Method chosen by familiarity instead of fit",
                "Design validation deferred until data collection",
            ],
        },
        ResearchAct::KnowledgeAcquisition => ActProfile {
            purpose: "Gather and organize the literature and source material the project will stand on.",
            success_criteria: &[
                "Key sources stored with retrievable references",
                "Core concepts extracted and named",
            ],
            common_challenges: &[
                "Search breadth without source management",
                "Concepts duplicated under different names",
            ],
        },
        ResearchAct::AnalysisSynthesis => ActProfile {
            purpose: "Turn gathered material into patterns, connections, and a coherent synthesis.",
            success_criteria: &[
                "Recurring patterns identified across sources",
                "A research summary that a colleague can follow",
            ],
            common_challenges: &[
                "Summaries that enumerate instead of synthesize",
                "Patterns asserted without supporting documents",
            ],
        },
        ResearchAct::ValidationRefinement => ActProfile {
            purpose: "Stress the work through review, quality gates, and equal-treatment paradigm validation.",
            success_criteria: &[
                "Peer-review objections anticipated and answered",
                "Quality gates passing for the target venue",
                "Alternative frameworks compared on equal footing",
            ],
            common_challenges: &[
                "Review simulated only after the draft is finished",
                "Novel claims validated by sympathetic criteria",
            ],
        },
        ResearchAct::Communication => ActProfile {
            purpose: "Produce the documents, bibliographies, and project records that carry the work to readers.",
            success_criteria: &[
                "Manuscript compiled without errors",
                "Bibliography generated from stored references",
            ],
            common_challenges: &[
                "Formatting churn crowding out content passes",
                "References managed by hand at the last minute",
            ],
        },
    }
}

fn adaptations(act: ResearchAct, level: ExperienceLevel) -> Vec<String> {
    let act_name = act.display_name();
    match level {
        ExperienceLevel::Beginner => vec![
            format!("Work through the {act_name} tools in the listed order; each one sets up the next."),
            "Prefer short, concrete inputs; the tools ask follow-ups when they need more.".to_owned(),
        ],
        ExperienceLevel::Intermediate => vec![
            format!("Use the {act_name} tools to pressure-test decisions you have already drafted."),
            "Skip orientation steps you have covered, but keep the validation steps.".to_owned(),
        ],
        ExperienceLevel::Expert => vec![
            format!("Treat the {act_name} tools as adversarial reviewers rather than guides."),
            "Feed in your strongest framing and look for the objections you have not met.".to_owned(),
        ],
    }
}

/// Build guidance for `act` given the set of tools already used.
#[must_use]
pub fn act_guidance(
    framework: &ResearchFramework,
    act: ResearchAct,
    level: ExperienceLevel,
    used: &HashSet<String>,
) -> ActGuidance {
    let tools = framework.tools_for_act(act);
    let profile = profile(act);

    let remaining: Vec<&str> = tools
        .iter()
        .copied()
        .filter(|t| !used.contains(*t))
        .collect();

    let next_tools: Vec<ToolSuggestion> = remaining
        .iter()
        .take(3)
        .map(|tool| ToolSuggestion {
            tool: (*tool).to_owned(),
            rationale: format!(
                "Next unused step in the {} progression ({})",
                act.display_name(),
                framework.category_for_tool(tool).unwrap_or("general")
            ),
        })
        .collect();

    ActGuidance {
        act,
        purpose: profile.purpose.to_owned(),
        key_activities: tools.iter().map(|t| (*t).to_owned()).collect(),
        success_criteria: profile.success_criteria.iter().map(|s| (*s).to_owned()).collect(),
        common_challenges: profile
            .common_challenges
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
        adaptations: adaptations(act, level),
        advance_to: if remaining.is_empty() { act.next() } else { None },
        next_tools,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::tool_names as tn;

    #[test]
    fn suggests_unused_tools_in_progression_order() {
        let fw = ResearchFramework::new();
        let used: HashSet<String> = [tn::CLARIFY_RESEARCH_GOALS.to_owned()].into();
        let guidance = act_guidance(
            &fw,
            ResearchAct::Conceptualization,
            ExperienceLevel::Beginner,
            &used,
        );
        let names: Vec<&str> = guidance.next_tools.iter().map(|t| t.tool.as_str()).collect();
        assert_eq!(
            names,
            vec![
                tn::ASSESS_FOUNDATIONAL_ASSUMPTIONS,
                tn::GENERATE_CRITICAL_QUESTIONS
            ]
        );
        assert!(guidance.advance_to.is_none());
        assert!(guidance.next_tools.iter().all(|t| !t.rationale.is_empty()));
    }

    #[test]
    fn completed_act_advances_to_next() {
        let fw = ResearchFramework::new();
        let used: HashSet<String> = fw
            .tools_for_act(ResearchAct::Conceptualization)
            .into_iter()
            .map(str::to_owned)
            .collect();
        let guidance = act_guidance(
            &fw,
            ResearchAct::Conceptualization,
            ExperienceLevel::Expert,
            &used,
        );
        assert!(guidance.next_tools.is_empty());
        assert_eq!(guidance.advance_to, Some(ResearchAct::DesignPlanning));
    }

    #[test]
    fn at_most_three_suggestions() {
        let fw = ResearchFramework::new();
        let guidance = act_guidance(
            &fw,
            ResearchAct::ValidationRefinement,
            ExperienceLevel::Intermediate,
            &HashSet::new(),
        );
        assert_eq!(guidance.next_tools.len(), 3);
    }

    #[test]
    fn unknown_level_defaults_to_intermediate() {
        assert_eq!(
            ExperienceLevel::parse_or_default("grandmaster"),
            ExperienceLevel::Intermediate
        );
    }
}
