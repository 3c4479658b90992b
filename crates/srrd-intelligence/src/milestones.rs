// ABOUTME: Milestone detection over accumulated tool-usage history
// ABOUTME: Act-completion, usage-threshold, diversity, and momentum detectors
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use crate::framework::ResearchFramework;
use crate::progress::compute_progress;
use crate::types::UsageSample;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Act completion percentage at which the completion detector fires.
pub const ACT_COMPLETION_THRESHOLD: f64 = 80.0;

/// Total-invocation counts that each earn a milestone once.
pub const USAGE_THRESHOLDS: [usize; 5] = [10, 25, 50, 100, 200];

/// Distinct tools required for the diversity milestone.
pub const DIVERSITY_THRESHOLD: usize = 10;

/// Momentum: this many qualifying days in the trailing seven.
const MOMENTUM_DAYS: usize = 5;
/// Momentum: a day qualifies with at least this many invocations.
const MOMENTUM_DAILY_MIN: usize = 3;

/// A detected achievement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Category icon
    pub icon: String,
    /// Short title
    pub title: String,
    /// What was achieved
    pub description: String,
    /// Why it matters
    pub significance: String,
    /// Suggested next goal, when one is evident
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_goal: Option<String>,
}

/// Run all detectors over the usage history.
///
/// Detection is pure: every currently-satisfied milestone is reported.
/// Callers that want fire-once semantics diff against their previously
/// persisted set.
#[must_use]
pub fn detect_milestones(
    framework: &ResearchFramework,
    usage: &[UsageSample],
    today: NaiveDate,
) -> Vec<Milestone> {
    let mut milestones = Vec::new();
    act_completion_milestones(framework, usage, &mut milestones);
    usage_threshold_milestones(usage, &mut milestones);
    diversity_milestone(usage, &mut milestones);
    momentum_milestone(usage, today, &mut milestones);
    milestones
}

/// The neutral response when nothing has fired yet.
#[must_use]
pub fn neutral_response() -> Milestone {
    Milestone {
        icon: "🌱".to_owned(),
        title: "Keep Going".to_owned(),
        description: "No milestones yet - every research journey starts small.".to_owned(),
        significance: "Consistent tool use builds the history that milestones are detected from."
            .to_owned(),
        next_goal: Some("Reach 10 total tool invocations".to_owned()),
    }
}

fn act_completion_milestones(
    framework: &ResearchFramework,
    usage: &[UsageSample],
    out: &mut Vec<Milestone>,
) {
    let report = compute_progress(framework, usage);
    for act in &report.acts {
        if act.total_tools > 0 && act.completion_percent >= ACT_COMPLETION_THRESHOLD {
            out.push(Milestone {
                icon: act.act.icon().to_owned(),
                title: format!("{} Act Completed", act.act.display_name()),
                description: format!(
                    "{:.0}% of the {} tools have been used ({} of {}).",
                    act.completion_percent,
                    act.act.display_name(),
                    act.used_tools.len(),
                    act.total_tools
                ),
                significance: format!(
                    "The {} phase of the research workflow is substantially covered.",
                    act.act.display_name()
                ),
                next_goal: act
                    .act
                    .next()
                    .map(|next| format!("Begin working through {}", next.display_name())),
            });
        }
    }
}

fn usage_threshold_milestones(usage: &[UsageSample], out: &mut Vec<Milestone>) {
    let total = usage.len();
    for threshold in USAGE_THRESHOLDS {
        if total >= threshold {
            out.push(Milestone {
                icon: "🏆".to_owned(),
                title: format!("{threshold} Tools Used Milestone"),
                description: format!(
                    "Total tool invocations have reached {threshold} (currently {total})."
                ),
                significance: "Sustained engagement with the research toolkit.".to_owned(),
                next_goal: USAGE_THRESHOLDS
                    .iter()
                    .find(|t| **t > total)
                    .map(|t| format!("Reach {t} total invocations")),
            });
        }
    }
}

fn diversity_milestone(usage: &[UsageSample], out: &mut Vec<Milestone>) {
    let distinct: HashSet<&str> = usage.iter().map(|u| u.tool_name.as_str()).collect();
    if distinct.len() >= DIVERSITY_THRESHOLD {
        out.push(Milestone {
            icon: "🧭".to_owned(),
            title: "Research Tool Explorer".to_owned(),
            description: format!("{} distinct tools have been used.", distinct.len()),
            significance: "Broad coverage of the toolkit across research activities.".to_owned(),
            next_goal: None,
        });
    }
}

fn momentum_milestone(usage: &[UsageSample], today: NaiveDate, out: &mut Vec<Milestone>) {
    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for sample in usage {
        let date = sample.recorded_at.date_naive();
        let in_window = (today - date).num_days() < 7 && date <= today;
        if in_window {
            *per_day.entry(date).or_insert(0) += 1;
        }
    }
    let qualifying = per_day.values().filter(|c| **c >= MOMENTUM_DAILY_MIN).count();
    if qualifying >= MOMENTUM_DAYS {
        out.push(Milestone {
            icon: "🔥".to_owned(),
            title: "Consistent Research Momentum".to_owned(),
            description: format!(
                "{qualifying} of the last 7 days had {MOMENTUM_DAILY_MIN} or more tool invocations."
            ),
            significance: "Regular daily engagement is the strongest predictor of finished research."
                .to_owned(),
            next_goal: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::tool_names as tn;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn at(day: u32, minute: u32, tool: &str) -> UsageSample {
        UsageSample::new(
            tool,
            Utc.with_ymd_and_hms(2026, 3, day, 9, minute, 0).single().unwrap(),
        )
    }

    #[test]
    fn fresh_project_detects_nothing() {
        let fw = ResearchFramework::new();
        assert!(detect_milestones(&fw, &[], today()).is_empty());
    }

    #[test]
    fn ten_distinct_tools_fire_threshold_and_explorer() {
        let fw = ResearchFramework::new();
        let tools = [
            tn::CLARIFY_RESEARCH_GOALS,
            tn::ASSESS_FOUNDATIONAL_ASSUMPTIONS,
            tn::GENERATE_CRITICAL_QUESTIONS,
            tn::SUGGEST_METHODOLOGY,
            tn::EXPLAIN_METHODOLOGY,
            tn::COMPARE_APPROACHES,
            tn::VALIDATE_DESIGN,
            tn::ENSURE_ETHICS,
            tn::SEMANTIC_SEARCH,
            tn::EXTRACT_KEY_CONCEPTS,
        ];
        let usage: Vec<UsageSample> = tools
            .iter()
            .enumerate()
            .map(|(i, t)| at(9, i as u32, t))
            .collect();
        let milestones = detect_milestones(&fw, &usage, today());
        let titles: Vec<&str> = milestones.iter().map(|m| m.title.as_str()).collect();
        assert!(titles.contains(&"10 Tools Used Milestone"));
        assert!(titles.contains(&"Research Tool Explorer"));
        for m in &milestones {
            assert!(!m.icon.is_empty());
            assert!(!m.description.is_empty());
            assert!(!m.significance.is_empty());
        }
    }

    #[test]
    fn act_completion_fires_at_eighty_percent() {
        let fw = ResearchFramework::new();
        let usage = vec![
            at(9, 0, tn::CLARIFY_RESEARCH_GOALS),
            at(9, 1, tn::ASSESS_FOUNDATIONAL_ASSUMPTIONS),
            at(9, 2, tn::GENERATE_CRITICAL_QUESTIONS),
        ];
        let milestones = detect_milestones(&fw, &usage, today());
        assert!(milestones
            .iter()
            .any(|m| m.title == "Conceptualization Act Completed"));
    }

    #[test]
    fn momentum_requires_five_busy_days() {
        let fw = ResearchFramework::new();
        let mut usage = Vec::new();
        for day in 5..10 {
            for minute in 0..3 {
                usage.push(at(day, minute, tn::SEMANTIC_SEARCH));
            }
        }
        let milestones = detect_milestones(&fw, &usage, today());
        assert!(milestones
            .iter()
            .any(|m| m.title == "Consistent Research Momentum"));

        // Four busy days are not enough.
        let short: Vec<UsageSample> = usage
            .iter()
            .filter(|u| u.recorded_at.date_naive().day0() >= 5)
            .cloned()
            .collect();
        let milestones = detect_milestones(&fw, &short, today());
        assert!(!milestones
            .iter()
            .any(|m| m.title == "Consistent Research Momentum"));
    }
}
