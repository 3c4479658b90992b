// ABOUTME: Journey analytics over a bounded time period of usage and interactions
// ABOUTME: Timeline, domain evolution, sophistication trend, productivity, next-act prediction
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

use crate::framework::{ResearchAct, ResearchFramework};
use crate::types::{InteractionSample, UsageSample};
use crate::velocity::Trend;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reporting period for journey analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    /// Trailing seven days
    LastWeek,
    /// Trailing thirty days
    LastMonth,
    /// Everything recorded
    AllTime,
}

impl TimePeriod {
    /// Parse with an all-time default for unknown input.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "last_week" | "week" => Self::LastWeek,
            "last_month" | "month" => Self::LastMonth,
            _ => Self::AllTime,
        }
    }

    /// Inclusive lower bound of the period relative to `now`.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::LastWeek => Some(now - Duration::days(7)),
            Self::LastMonth => Some(now - Duration::days(30)),
            Self::AllTime => None,
        }
    }
}

/// One invocation mapped onto its research act.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Tool invoked
    pub tool: String,
    /// Act the tool belongs to, when the taxonomy knows it
    pub act: Option<ResearchAct>,
    /// When it ran
    pub at: DateTime<Utc>,
}

/// Domain mix extracted from stored semantic analyses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvolution {
    /// Domains in first-seen order
    pub sequence: Vec<String>,
    /// Occurrences per domain
    pub counts: HashMap<String, usize>,
    /// Most frequent domain, if any analysis carried one
    pub dominant: Option<String>,
}

/// Per-weekday productivity distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityPatterns {
    /// Invocations per weekday, Monday first
    pub per_weekday: Vec<usize>,
    /// Weekday with the most invocations, if any activity exists
    pub busiest_weekday: Option<String>,
}

/// Predicted next act from the canonical chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActPrediction {
    /// Act the researcher is most engaged with now
    pub current_focus: ResearchAct,
    /// Likely next act
    pub next_act: Option<ResearchAct>,
    /// Short explanation of the prediction
    pub basis: String,
}

/// Full journey report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyReport {
    /// Period covered
    pub period: TimePeriod,
    /// Act-mapped chronological timeline, oldest first
    pub timeline: Vec<TimelineEntry>,
    /// Domain mix over the period
    pub domain_evolution: DomainEvolution,
    /// Sophistication movement over the period
    pub sophistication_trend: Trend,
    /// Per-weekday activity distribution
    pub productivity: ProductivityPatterns,
    /// Present only when predictions were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<ActPrediction>,
}

/// Analyze the journey over `period`, optionally predicting the next act.
#[must_use]
pub fn analyze_journey(
    framework: &ResearchFramework,
    usage: &[UsageSample],
    interactions: &[InteractionSample],
    period: TimePeriod,
    now: DateTime<Utc>,
    include_predictions: bool,
) -> JourneyReport {
    let cutoff = period.cutoff(now);
    let in_period = |at: DateTime<Utc>| cutoff.map_or(true, |c| at >= c);

    let mut timeline: Vec<TimelineEntry> = usage
        .iter()
        .filter(|u| in_period(u.recorded_at))
        .map(|u| TimelineEntry {
            tool: u.tool_name.clone(),
            act: framework.act_for_tool(&u.tool_name),
            at: u.recorded_at,
        })
        .collect();
    timeline.sort_by_key(|e| e.at);

    let period_interactions: Vec<&InteractionSample> = interactions
        .iter()
        .filter(|i| in_period(i.recorded_at))
        .collect();

    let prediction = include_predictions.then(|| predict(framework, &timeline));

    JourneyReport {
        period,
        domain_evolution: domain_evolution(&period_interactions),
        sophistication_trend: sophistication_trend(&period_interactions),
        productivity: productivity(&timeline),
        prediction,
        timeline,
    }
}

fn domain_evolution(interactions: &[&InteractionSample]) -> DomainEvolution {
    let mut sequence = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for sample in interactions {
        if let Some(domain) = &sample.domain {
            if !counts.contains_key(domain) {
                sequence.push(domain.clone());
            }
            *counts.entry(domain.clone()).or_insert(0) += 1;
        }
    }
    let dominant = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(domain, _)| domain.clone());
    DomainEvolution {
        sequence,
        counts,
        dominant,
    }
}

fn sophistication_trend(interactions: &[&InteractionSample]) -> Trend {
    let scores: Vec<f64> = interactions
        .iter()
        .filter_map(|i| i.sophistication)
        .collect();
    if scores.len() < 2 {
        return Trend::Flat;
    }
    let mid = scores.len() / 2;
    let first = scores[..mid].iter().sum::<f64>() / mid as f64;
    let second = scores[mid..].iter().sum::<f64>() / (scores.len() - mid) as f64;
    if second > first + 0.05 {
        Trend::Rising
    } else if second < first - 0.05 {
        Trend::Falling
    } else {
        Trend::Flat
    }
}

fn productivity(timeline: &[TimelineEntry]) -> ProductivityPatterns {
    let mut per_weekday = vec![0usize; 7];
    for entry in timeline {
        per_weekday[entry.at.weekday().num_days_from_monday() as usize] += 1;
    }
    let busiest_weekday = per_weekday
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .max_by_key(|(_, count)| **count)
        .map(|(idx, _)| weekday_name(idx).to_owned());
    ProductivityPatterns {
        per_weekday,
        busiest_weekday,
    }
}

fn weekday_name(idx: usize) -> &'static str {
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"][idx.min(6)]
}

fn predict(framework: &ResearchFramework, timeline: &[TimelineEntry]) -> ActPrediction {
    // Focus = the act with the most recent weight: count occurrences, with
    // the last few entries counting double so drift shows up quickly.
    let mut weights: HashMap<ResearchAct, usize> = HashMap::new();
    let recent_cut = timeline.len().saturating_sub(3);
    for (idx, entry) in timeline.iter().enumerate() {
        if let Some(act) = entry.act {
            *weights.entry(act).or_insert(0) += if idx >= recent_cut { 2 } else { 1 };
        }
    }

    let current_focus = ResearchAct::ALL
        .into_iter()
        .max_by_key(|act| weights.get(act).copied().unwrap_or(0))
        .filter(|act| weights.contains_key(act))
        .unwrap_or(ResearchAct::Conceptualization);

    let next_act = current_focus.next();
    let basis = match next_act {
        Some(next) => format!(
            "Recent activity concentrates in {}; the canonical chain continues with {}.",
            current_focus.display_name(),
            next.display_name()
        ),
        None => format!(
            "Recent activity concentrates in {}, the final act of the chain.",
            current_focus.display_name()
        ),
    };

    ActPrediction {
        current_focus,
        next_act,
        basis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::tool_names as tn;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).single().unwrap()
    }

    #[test]
    fn last_week_filters_old_entries() {
        let fw = ResearchFramework::new();
        let usage = vec![
            UsageSample::new(tn::CLARIFY_RESEARCH_GOALS, at(1, 9)),
            UsageSample::new(tn::SUGGEST_METHODOLOGY, at(28, 9)),
        ];
        let report = analyze_journey(&fw, &usage, &[], TimePeriod::LastWeek, at(30, 9), false);
        assert_eq!(report.timeline.len(), 1);
        assert_eq!(report.timeline[0].tool, tn::SUGGEST_METHODOLOGY);
        assert!(report.prediction.is_none());
    }

    #[test]
    fn timeline_maps_tools_to_acts_chronologically() {
        let fw = ResearchFramework::new();
        let usage = vec![
            UsageSample::new(tn::SUGGEST_METHODOLOGY, at(2, 9)),
            UsageSample::new(tn::CLARIFY_RESEARCH_GOALS, at(1, 9)),
        ];
        let report = analyze_journey(&fw, &usage, &[], TimePeriod::AllTime, at(30, 9), false);
        assert_eq!(report.timeline[0].act, Some(ResearchAct::Conceptualization));
        assert_eq!(report.timeline[1].act, Some(ResearchAct::DesignPlanning));
    }

    #[test]
    fn prediction_follows_the_canonical_chain() {
        let fw = ResearchFramework::new();
        let usage = vec![
            UsageSample::new(tn::CLARIFY_RESEARCH_GOALS, at(1, 9)),
            UsageSample::new(tn::ASSESS_FOUNDATIONAL_ASSUMPTIONS, at(1, 10)),
            UsageSample::new(tn::GENERATE_CRITICAL_QUESTIONS, at(1, 11)),
        ];
        let report = analyze_journey(&fw, &usage, &[], TimePeriod::AllTime, at(30, 9), true);
        let prediction = report.prediction.unwrap();
        assert_eq!(prediction.current_focus, ResearchAct::Conceptualization);
        assert_eq!(prediction.next_act, Some(ResearchAct::DesignPlanning));
        assert!(!prediction.basis.is_empty());
    }

    #[test]
    fn domain_evolution_tracks_dominant_domain() {
        let fw = ResearchFramework::new();
        let interactions = vec![
            InteractionSample {
                recorded_at: at(1, 9),
                domain: Some("physics".to_owned()),
                sophistication: Some(0.2),
            },
            InteractionSample {
                recorded_at: at(2, 9),
                domain: Some("physics".to_owned()),
                sophistication: Some(0.6),
            },
            InteractionSample {
                recorded_at: at(3, 9),
                domain: Some("mathematics".to_owned()),
                sophistication: Some(0.7),
            },
        ];
        let report =
            analyze_journey(&fw, &[], &interactions, TimePeriod::AllTime, at(30, 9), false);
        assert_eq!(report.domain_evolution.dominant.as_deref(), Some("physics"));
        assert_eq!(
            report.domain_evolution.sequence,
            vec!["physics".to_owned(), "mathematics".to_owned()]
        );
        assert_eq!(report.sophistication_trend, Trend::Rising);
    }
}
